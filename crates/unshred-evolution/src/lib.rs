//! Evolutionary search for the strip order of a shredded image.
//!
//! An image cut into N vertical strips and shuffled is reconstructed by
//! searching for the permutation of strip indices that an external
//! [`FitnessOracle`] scores as perfect (fitness `<= 0`). The search is a
//! generational genetic algorithm over permutations:
//!
//! 1. **Population** - `population_size` random permutations of `0..N`
//! 2. **Evaluation** - the oracle scores every individual whose fitness is unknown
//! 3. **Selection** - tournament selection builds a full set of offspring
//! 4. **Crossover** - consecutive offspring pairs are recombined with PMX
//! 5. **Mutation** - offspring genes are shuffled by random swaps
//! 6. **Replacement** - offspring replace the whole population (no elitism)
//! 7. **Repeat** - until the target fitness or the generation limit is reached
//!
//! # Architecture
//!
//! ```text
//! RunParams ──> Evolution (engine)
//!                  │ drives
//!                  ↓
//!              Population ──> Individual (genes + cached fitness)
//!                  │ transformed by
//!                  ↓
//!              operators::{Selection, Crossover, Mutation}
//!                  │ scored by
//!                  ↓
//!              FitnessOracle (external)
//! ```
//!
//! All randomness flows from one `Pcg32` seeded with [`RunParams::seed`], so
//! a run is reproducible given the same parameters and a deterministic oracle.
//!
//! See the [`engine`] module for the state machine and an end-to-end example.

pub use self::{
    engine::{Evolution, EvolutionOutcome, EvolutionState, GenerationReport, TerminationReason},
    error::{EvolutionError, PermutationError},
    individual::Individual,
    oracle::{FitnessOracle, OracleError},
    params::{ParamsError, RunParams},
    population::Population,
};
pub use unshred_stats::descriptive::DescriptiveStats;

pub mod engine;
pub mod error;
pub mod individual;
pub mod operators;
pub mod oracle;
pub mod params;
pub mod permutation;
pub mod population;
