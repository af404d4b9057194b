//! The generational evolution loop.
//!
//! [`Evolution`] owns the population, the random generator and the genetic
//! operators, and walks through the following states:
//!
//! ```text
//! Initializing ──> Evaluating ──> Terminated
//!                    ↑    │
//!                    │    ↓
//!                   Breeding
//! ```
//!
//! - **Initializing** builds `population_size` random permutations.
//! - **Evaluating** scores every individual without a fitness value, reports
//!   the generation statistics and checks for termination: either the best
//!   fitness reached `target_fitness`, or `max_generations` generations have
//!   been bred.
//! - **Breeding** selects a full set of offspring by tournament, crosses
//!   consecutive pairs with probability `crossover_probability`, attempts
//!   mutation on each offspring with probability `mutation_probability`, and
//!   replaces the whole population with the offspring. There is no elitism,
//!   so the best fitness of a generation may be worse than the previous one;
//!   the best individual ever seen is tracked separately.
//!
//! Any error aborts the run and leaves the engine in
//! [`EvolutionState::Aborted`].
//!
//! # Example
//!
//! ```
//! use unshred_evolution::{Evolution, FitnessOracle, OracleError, RunParams};
//!
//! /// Counts strips that are not at their own index.
//! struct Misplaced;
//!
//! impl FitnessOracle for Misplaced {
//!     fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
//!         Ok(permutation.iter().enumerate().filter(|(i, v)| i != *v).count() as f64)
//!     }
//!
//!     fn show_solution(&self, _permutation: &[usize]) -> Result<(), OracleError> {
//!         Ok(())
//!     }
//! }
//!
//! let params = RunParams {
//!     population_size: 20,
//!     genome_length: 5,
//!     max_generations: 100,
//!     gene_swap_probability: 0.2,
//!     ..RunParams::default()
//! };
//! let outcome = Evolution::new(params, Misplaced)
//!     .unwrap()
//!     .run(|report| println!("{}: {}", report.generation, report.fitness.min))
//!     .unwrap();
//! assert!(outcome.best_ever.fitness() <= outcome.best.fitness());
//! ```

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use unshred_stats::descriptive::DescriptiveStats;

use crate::{
    error::EvolutionError,
    individual::Individual,
    operators::{
        Crossover, Mutation, PartiallyMatchedCrossover, Selection, ShuffleIndexesMutation,
        TournamentSelection,
    },
    oracle::FitnessOracle,
    params::RunParams,
    population::{EvaluationFailure, Population},
};

/// Why a run stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// The best fitness reached the target
    #[display("converged")]
    Converged,
    /// The generation limit was reached first
    #[display("generation limit reached")]
    GenerationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EvolutionState {
    Initializing,
    Evaluating,
    Breeding,
    Terminated(TerminationReason),
    /// An error stopped the run; no result is available.
    Aborted,
}

/// Statistics of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Generation number, `0` for the initial population
    pub generation: usize,
    /// Number of oracle calls made for this generation
    pub evaluated: usize,
    /// Fitness distribution of the population
    pub fitness: DescriptiveStats,
    /// Lowest-fitness individual of the population (first one on ties)
    pub best: Individual,
}

/// Final result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionOutcome {
    pub reason: TerminationReason,
    /// Number of bred generations
    pub generations: usize,
    /// Best individual of the final population
    pub best: Individual,
    /// Best individual seen in any generation
    pub best_ever: Individual,
}

/// A single evolution run.
#[derive(Debug)]
pub struct Evolution<
    O,
    S = TournamentSelection,
    C = PartiallyMatchedCrossover,
    M = ShuffleIndexesMutation,
> {
    params: RunParams,
    oracle: O,
    selection: S,
    crossover: C,
    mutation: M,
    rng: Pcg32,
    population: Population,
    generation: usize,
    state: EvolutionState,
    best_ever: Option<Individual>,
    outcome: Option<EvolutionOutcome>,
}

impl<O> Evolution<O>
where
    O: FitnessOracle,
{
    /// Creates a run with the standard operators configured from `params`.
    pub fn new(params: RunParams, oracle: O) -> Result<Self, EvolutionError> {
        let selection = TournamentSelection {
            tournament_size: params.tournament_size,
        };
        let mutation = ShuffleIndexesMutation {
            gene_swap_probability: params.gene_swap_probability,
        };
        Self::with_operators(
            params,
            oracle,
            selection,
            PartiallyMatchedCrossover,
            mutation,
        )
    }
}

impl<O, S, C, M> Evolution<O, S, C, M>
where
    O: FitnessOracle,
    S: Selection,
    C: Crossover,
    M: Mutation,
{
    /// Creates a run with custom operators.
    ///
    /// `params.tournament_size` and `params.gene_swap_probability` are only
    /// validated here; the supplied operators carry their own settings.
    pub fn with_operators(
        params: RunParams,
        oracle: O,
        selection: S,
        crossover: C,
        mutation: M,
    ) -> Result<Self, EvolutionError> {
        params.validate()?;
        let rng = Pcg32::seed_from_u64(params.seed);
        Ok(Self {
            params,
            oracle,
            selection,
            crossover,
            mutation,
            rng,
            population: Population::default(),
            generation: 0,
            state: EvolutionState::Initializing,
            best_ever: None,
            outcome: None,
        })
    }

    #[must_use]
    pub fn params(&self) -> &RunParams {
        &self.params
    }

    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    #[must_use]
    pub fn state(&self) -> EvolutionState {
        self.state
    }

    /// Number of generations bred so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best individual seen in any evaluated generation.
    #[must_use]
    pub fn best_ever(&self) -> Option<&Individual> {
        self.best_ever.as_ref()
    }

    /// The result, once the run has terminated.
    #[must_use]
    pub fn outcome(&self) -> Option<&EvolutionOutcome> {
        self.outcome.as_ref()
    }

    /// Advances the run by one state transition.
    ///
    /// Returns the generation report when the step was an evaluation.
    /// Stepping a terminated run does nothing; stepping an aborted run fails
    /// with [`EvolutionError::Aborted`].
    pub fn step(&mut self) -> Result<Option<GenerationReport>, EvolutionError> {
        let result = self.advance();
        if result.is_err() {
            self.state = EvolutionState::Aborted;
        }
        result
    }

    /// Steps until termination, passing every generation report to `observer`.
    pub fn run<F>(mut self, mut observer: F) -> Result<EvolutionOutcome, EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        loop {
            if let Some(outcome) = self.outcome.take() {
                return Ok(outcome);
            }
            if let Some(report) = self.step()? {
                observer(&report);
            }
        }
    }

    fn advance(&mut self) -> Result<Option<GenerationReport>, EvolutionError> {
        match self.state {
            EvolutionState::Initializing => {
                self.population = Population::initialize(
                    self.params.population_size,
                    self.params.genome_length,
                    &mut self.rng,
                );
                self.state = EvolutionState::Evaluating;
                Ok(None)
            }
            EvolutionState::Evaluating => self.evaluate().map(Some),
            EvolutionState::Breeding => {
                self.breed()?;
                self.generation += 1;
                self.state = EvolutionState::Evaluating;
                Ok(None)
            }
            EvolutionState::Terminated(_) => Ok(None),
            EvolutionState::Aborted => Err(EvolutionError::Aborted),
        }
    }

    fn evaluate(&mut self) -> Result<GenerationReport, EvolutionError> {
        let generation = self.generation;
        let evaluated = self
            .population
            .evaluate_missing(&self.oracle, self.params.parallel_evaluation)
            .map_err(|EvaluationFailure { index, error }| {
                EvolutionError::OracleEvaluation {
                    generation,
                    index,
                    source: error,
                }
            })?;
        tracing::trace!(generation, evaluated, "population evaluated");

        // every individual is scored now, so only an empty population lacks a summary
        let (stats, best) = self
            .population
            .fitness_stats()
            .zip(self.population.best().cloned())
            .ok_or(EvolutionError::PopulationSize {
                expected: self.params.population_size,
                actual: 0,
            })?;

        let improved = self
            .best_ever
            .as_ref()
            .and_then(Individual::fitness)
            .is_none_or(|best_ever| stats.min < best_ever);
        if improved {
            self.best_ever = Some(best.clone());
        }

        tracing::debug!(
            generation,
            evaluated,
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            std_dev = stats.std_dev,
            "generation evaluated"
        );

        let report = GenerationReport {
            generation,
            evaluated,
            fitness: stats,
            best,
        };

        let reason = if stats.min <= self.params.target_fitness {
            Some(TerminationReason::Converged)
        } else if self.generation >= self.params.max_generations {
            Some(TerminationReason::GenerationLimit)
        } else {
            None
        };
        match reason {
            Some(reason) => {
                tracing::debug!(generation, %reason, "evolution terminated");
                self.state = EvolutionState::Terminated(reason);
                self.outcome = Some(EvolutionOutcome {
                    reason,
                    generations: self.generation,
                    best: report.best.clone(),
                    best_ever: self.best_ever.clone().unwrap_or_else(|| report.best.clone()),
                });
            }
            None => self.state = EvolutionState::Breeding,
        }
        Ok(report)
    }

    fn breed(&mut self) -> Result<(), EvolutionError> {
        // selection hands back clones, so offspring never alias the parents
        let offspring = self.selection.select(
            &self.population,
            self.params.population_size,
            &mut self.rng,
        )?;
        let mut offspring = offspring.into_individuals();

        // an odd last offspring has no partner and is left uncrossed
        for pair in offspring.chunks_exact_mut(2) {
            let [a, b] = pair else {
                continue;
            };
            if self.rng.random_bool(self.params.crossover_probability) {
                self.crossover.crossover(a, b, &mut self.rng)?;
                a.invalidate();
                b.invalidate();
            }
        }

        for ind in &mut offspring {
            if self.rng.random_bool(self.params.mutation_probability) {
                self.mutation.mutate(ind, &mut self.rng);
                ind.invalidate();
            }
        }

        self.population.replace(Population::from(offspring))
    }
}
