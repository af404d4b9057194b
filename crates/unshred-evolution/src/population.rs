//! Populations of candidate strip orders.
//!
//! A [`Population`] keeps its individuals in a fixed order for its whole
//! lifetime: selection reports and failure indices refer to positions in
//! that order. The size is fixed once the population is created, and
//! [`Population::replace`] refuses offspring of any other size.
//!
//! # Evaluation
//!
//! [`Population::evaluate_missing`] is the only place that calls the
//! [`FitnessOracle`]. It scores the individuals that lost their fitness since
//! the last generation, optionally on one scoped thread per individual, and
//! joins every thread before returning. Scores must be finite numbers; a NaN
//! or infinite score is reported like any other oracle failure.

use std::thread;

use rand::Rng;
use unshred_stats::descriptive::DescriptiveStats;

use crate::{
    error::EvolutionError,
    individual::Individual,
    oracle::{FitnessOracle, OracleError},
};


/// An ordered collection of individuals evaluated together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

/// An individual whose evaluation failed, identified by its position.
#[derive(Debug)]
pub struct EvaluationFailure {
    pub index: usize,
    pub error: OracleError,
}

impl From<Vec<Individual>> for Population {
    fn from(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }
}

impl Population {
    /// Creates a population of random individuals.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of individuals in the population
    /// * `n` - Number of genes (strips) of each individual
    /// * `rng` - Random number generator
    #[must_use]
    pub fn initialize<R>(count: usize, n: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new_random(n, rng))
            .collect();
        Self { individuals }
    }

    /// Returns all individuals in population order.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    #[must_use]
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Returns the number of individuals that still need an oracle call.
    #[must_use]
    pub fn count_missing(&self) -> usize {
        self.individuals.iter().filter(|ind| !ind.is_valid()).count()
    }

    /// Evaluates every individual without a fitness value, exactly once each.
    ///
    /// Individuals that already carry a fitness are left untouched. With
    /// `parallel` set, each pending individual is scored on its own scoped
    /// thread; all threads are joined before this returns.
    ///
    /// # Arguments
    ///
    /// * `oracle` - Scores a strip order, lower is better
    /// * `parallel` - Evaluate on scoped threads instead of sequentially
    ///
    /// # Returns
    ///
    /// The number of oracle calls made. On failure the first failing
    /// individual (lowest index) is reported, including individuals whose
    /// score is not a finite number. Individuals that were scored
    /// successfully keep their fitness, but the population must not be used
    /// for selection.
    pub fn evaluate_missing<O>(
        &mut self,
        oracle: &O,
        parallel: bool,
    ) -> Result<usize, EvaluationFailure>
    where
        O: FitnessOracle + ?Sized,
    {
        let pending = self
            .individuals
            .iter_mut()
            .enumerate()
            .filter(|(_, ind)| !ind.is_valid())
            .collect::<Vec<_>>();
        let count = pending.len();

        let results = if parallel && count > 1 {
            thread::scope(|s| {
                let handles = pending
                    .into_iter()
                    .map(|(index, ind)| {
                        s.spawn(move || {
                            let result = oracle.evaluate_solution(ind.genes());
                            (index, ind, result)
                        })
                    })
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(result) => result,
                        Err(payload) => std::panic::resume_unwind(payload),
                    })
                    .collect::<Vec<_>>()
            })
        } else {
            pending
                .into_iter()
                .map(|(index, ind)| {
                    let result = oracle.evaluate_solution(ind.genes());
                    (index, ind, result)
                })
                .collect()
        };

        let mut failure = None;
        for (index, ind, result) in results {
            match result.and_then(check_score) {
                Ok(fitness) => ind.set_fitness(fitness),
                Err(error) if failure.is_none() => {
                    failure = Some(EvaluationFailure { index, error });
                }
                Err(_) => {}
            }
        }
        match failure {
            Some(failure) => Err(failure),
            None => Ok(count),
        }
    }

    /// Returns every fitness value in population order.
    ///
    /// Fails with [`EvolutionError::Precondition`] naming the first
    /// unevaluated individual.
    pub fn require_fitness(&self) -> Result<Vec<f64>, EvolutionError> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(index, ind)| ind.fitness().ok_or(EvolutionError::Precondition { index }))
            .collect()
    }

    /// Replaces every individual with `offspring`.
    ///
    /// The population keeps its size across generations: if `offspring` holds
    /// a different number of individuals, nothing is replaced and
    /// [`EvolutionError::PopulationSize`] is returned.
    pub fn replace(&mut self, offspring: Population) -> Result<(), EvolutionError> {
        if offspring.len() != self.len() {
            return Err(EvolutionError::PopulationSize {
                expected: self.len(),
                actual: offspring.len(),
            });
        }
        self.individuals = offspring.individuals;
        Ok(())
    }

    /// Returns the individual with the lowest fitness.
    ///
    /// Ties go to the earliest individual. Returns `None` if the population is
    /// empty or any individual is unevaluated.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        let mut best: Option<(&Individual, f64)> = None;
        for ind in &self.individuals {
            let fitness = ind.fitness()?;
            if best.is_none_or(|(_, best_fitness)| fitness < best_fitness) {
                best = Some((ind, fitness));
            }
        }
        best.map(|(ind, _)| ind)
    }

    /// Computes descriptive statistics of the fitness values.
    ///
    /// Returns `None` if the population is empty or any individual is unevaluated.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        let fitness = self
            .individuals
            .iter()
            .map(Individual::fitness)
            .collect::<Option<Vec<_>>>()?;
        DescriptiveStats::new(fitness)
    }
}

fn check_score(fitness: f64) -> Result<f64, OracleError> {
    if fitness.is_finite() {
        Ok(fitness)
    } else {
        Err(OracleError::new(format!(
            "fitness must be a finite number, got {fitness}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::permutation;

    /// Scores a permutation by its number of misplaced genes.
    #[derive(Debug, Default)]
    struct Misplaced {
        calls: AtomicUsize,
    }

    impl FitnessOracle for Misplaced {
        #[expect(clippy::cast_precision_loss)]
        fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(permutation
                .iter()
                .enumerate()
                .filter(|(i, v)| i != *v)
                .count() as f64)
        }

        fn show_solution(&self, _permutation: &[usize]) -> Result<(), OracleError> {
            Ok(())
        }
    }

    struct Failing;

    impl FitnessOracle for Failing {
        fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
            if permutation.first() == Some(&0) {
                Err(OracleError::new("strip 0 cannot lead"))
            } else {
                Ok(1.0)
            }
        }

        fn show_solution(&self, _permutation: &[usize]) -> Result<(), OracleError> {
            Ok(())
        }
    }

    #[test]
    fn test_initialize() {
        let mut rng = Pcg32::seed_from_u64(3);
        let pop = Population::initialize(10, 6, &mut rng);
        assert_eq!(pop.len(), 10);
        for ind in pop.individuals() {
            assert_eq!(permutation::validate(ind.genes(), 6), Ok(()));
            assert!(!ind.is_valid());
        }
        assert_eq!(pop.count_missing(), 10);
    }

    #[test]
    fn test_evaluate_missing_only_touches_invalid() {
        for parallel in [false, true] {
            let mut rng = Pcg32::seed_from_u64(4);
            let mut pop = Population::initialize(8, 5, &mut rng);
            pop.individuals_mut()[2].set_fitness(-42.0);
            pop.individuals_mut()[5].set_fitness(-7.0);

            let oracle = Misplaced::default();
            let evaluated = pop.evaluate_missing(&oracle, parallel).unwrap();
            assert_eq!(evaluated, 6);
            assert_eq!(oracle.calls.load(Ordering::Relaxed), 6);
            assert_eq!(pop.individuals()[2].fitness(), Some(-42.0));
            assert_eq!(pop.individuals()[5].fitness(), Some(-7.0));
            assert_eq!(pop.count_missing(), 0);

            // a second pass has nothing left to do
            assert_eq!(pop.evaluate_missing(&oracle, parallel).unwrap(), 0);
            assert_eq!(oracle.calls.load(Ordering::Relaxed), 6);
        }
    }

    #[test]
    fn test_evaluate_missing_reports_first_failure() {
        for parallel in [false, true] {
            let mut pop = Population::from(vec![
                Individual::from_genes(vec![1, 0, 2]).unwrap(),
                Individual::from_genes(vec![0, 2, 1]).unwrap(),
                Individual::from_genes(vec![2, 1, 0]).unwrap(),
                Individual::from_genes(vec![0, 1, 2]).unwrap(),
            ]);
            let failure = pop.evaluate_missing(&Failing, parallel).unwrap_err();
            assert_eq!(failure.index, 1);
            assert_eq!(failure.error.message(), "strip 0 cannot lead");
        }
    }

    /// Scores strip orders by their first gene, which may be mapped to a non-finite value.
    struct FirstGene(f64);

    impl FitnessOracle for FirstGene {
        #[expect(clippy::cast_precision_loss)]
        fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
            match permutation.first() {
                Some(0) => Ok(self.0),
                Some(&first) => Ok(first as f64),
                None => Ok(0.0),
            }
        }

        fn show_solution(&self, _permutation: &[usize]) -> Result<(), OracleError> {
            Ok(())
        }
    }

    #[test]
    fn test_evaluate_missing_rejects_non_finite_scores() {
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for parallel in [false, true] {
                let mut pop = Population::from(vec![
                    Individual::from_genes(vec![2, 0, 1]).unwrap(),
                    Individual::from_genes(vec![1, 2, 0]).unwrap(),
                    Individual::from_genes(vec![0, 1, 2]).unwrap(),
                ]);
                let failure = pop.evaluate_missing(&FirstGene(score), parallel).unwrap_err();
                assert_eq!(failure.index, 2);
                assert!(failure.error.message().contains("finite"));
                assert_eq!(pop.individuals()[0].fitness(), Some(2.0));
                assert!(!pop.individuals()[2].is_valid());
            }
        }
    }

    #[test]
    fn test_replace_keeps_population_size() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut pop = Population::initialize(4, 3, &mut rng);
        let before = pop.clone();

        let short = Population::initialize(3, 3, &mut rng);
        assert!(matches!(
            pop.replace(short),
            Err(EvolutionError::PopulationSize {
                expected: 4,
                actual: 3
            })
        ));
        assert_eq!(pop, before);

        let next = Population::initialize(4, 3, &mut rng);
        pop.replace(next.clone()).unwrap();
        assert_eq!(pop, next);
    }

    #[test]
    fn test_best_and_stats() {
        let mut pop = Population::from(vec![
            Individual::from_genes(vec![1, 0]).unwrap(),
            Individual::from_genes(vec![0, 1]).unwrap(),
            Individual::from_genes(vec![1, 0]).unwrap(),
        ]);
        assert!(pop.best().is_none());
        assert!(pop.fitness_stats().is_none());

        for (ind, fitness) in pop.individuals_mut().iter_mut().zip([4.0, 1.0, 1.0]) {
            ind.set_fitness(fitness);
        }
        let best = pop.best().unwrap();
        assert_eq!(best.genes(), &[0, 1]);

        let stats = pop.fitness_stats().unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.0);
    }
}
