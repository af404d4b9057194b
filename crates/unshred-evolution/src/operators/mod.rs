//! Genetic operators over permutation-encoded individuals.
//!
//! Each operator is available both as a free function and as a strategy type
//! implementing one of the [`Selection`], [`Crossover`] and [`Mutation`]
//! traits. The evolution engine is composed against the traits, so a run can
//! swap in a different operator without touching the generational loop.
//!
//! | trait | default strategy |
//! |-------|------------------|
//! | [`Selection`] | [`TournamentSelection`] |
//! | [`Crossover`] | [`PartiallyMatchedCrossover`] |
//! | [`Mutation`] | [`ShuffleIndexesMutation`] |
//!
//! Every operator keeps the permutation invariant: no gene is ever duplicated
//! or dropped.

use rand::Rng;

use crate::{error::EvolutionError, individual::Individual, population::Population};

pub use self::{
    crossover::PartiallyMatchedCrossover, mutation::ShuffleIndexesMutation,
    selection::TournamentSelection,
};

pub mod crossover;
pub mod mutation;
pub mod selection;

/// Picks the parents of the next generation.
pub trait Selection {
    /// Returns `count` individuals chosen from `population`, with repetition.
    fn select<R>(
        &self,
        population: &Population,
        count: usize,
        rng: &mut R,
    ) -> Result<Population, EvolutionError>
    where
        R: Rng + ?Sized;
}

/// Recombines two individuals in place.
pub trait Crossover {
    /// Crosses `a` and `b`, invalidating both fitness values.
    fn crossover<R>(
        &self,
        a: &mut Individual,
        b: &mut Individual,
        rng: &mut R,
    ) -> Result<(), EvolutionError>
    where
        R: Rng + ?Sized;
}

/// Perturbs one individual in place.
pub trait Mutation {
    /// Mutates `individual`, returning the number of gene changes applied.
    fn mutate<R>(&self, individual: &mut Individual, rng: &mut R) -> usize
    where
        R: Rng + ?Sized;
}
