use serde::{Deserialize, Serialize};

/// Immutable configuration of one evolution run.
///
/// Defaults reproduce the reference setup: 100 individuals of 64 strips,
/// crossover probability 0.9, mutation attempted on every offspring with a
/// 0.005 per-gene swap probability, tournaments of 3, at most 500 generations,
/// seed 30.
///
/// # Examples
///
/// ```
/// use unshred_evolution::RunParams;
///
/// let params = RunParams {
///     genome_length: 16,
///     max_generations: 50,
///     ..RunParams::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunParams {
    /// Number of individuals per generation (P)
    pub population_size: usize,
    /// Number of strips, i.e. permutation length (N)
    pub genome_length: usize,
    /// Probability that a consecutive offspring pair is crossed (CXPB)
    pub crossover_probability: f64,
    /// Probability that mutation is attempted on an offspring (MUTPB)
    pub mutation_probability: f64,
    /// Per-position swap probability inside a mutation (indpb)
    pub gene_swap_probability: f64,
    /// Number of contestants per tournament (K)
    pub tournament_size: usize,
    /// Generation limit (`G_max`)
    pub max_generations: usize,
    /// The run stops once the best fitness is at or below this value
    pub target_fitness: f64,
    /// Seed of the run's random generator
    pub seed: u64,
    /// Evaluate pending individuals on scoped threads
    pub parallel_evaluation: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            genome_length: 64,
            crossover_probability: 0.9,
            mutation_probability: 1.0,
            gene_swap_probability: 0.005,
            tournament_size: 3,
            max_generations: 500,
            target_fitness: 0.0,
            seed: 30,
            parallel_evaluation: true,
        }
    }
}

/// A [`RunParams`] field outside its usable range.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("genome length must be positive")]
    EmptyGenome,
    #[display("tournament size must be positive")]
    EmptyTournament,
    #[display("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}

impl RunParams {
    /// Checks that the parameters describe a runnable configuration.
    ///
    /// The engine calls this before building its first population, and the
    /// command line calls it after merging a config file with flags.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the run can start, otherwise the first problem found:
    ///
    /// * [`ParamsError::EmptyPopulation`] - `population_size` is zero
    /// * [`ParamsError::EmptyGenome`] - `genome_length` is zero
    /// * [`ParamsError::EmptyTournament`] - `tournament_size` is zero
    /// * [`ParamsError::InvalidProbability`] - a probability is outside
    ///   `[0, 1]` or NaN
    ///
    /// An odd `population_size` is accepted; the last offspring of each
    /// generation then has no crossover partner.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.population_size == 0 {
            return Err(ParamsError::EmptyPopulation);
        }
        if self.genome_length == 0 {
            return Err(ParamsError::EmptyGenome);
        }
        if self.tournament_size == 0 {
            return Err(ParamsError::EmptyTournament);
        }
        for (name, value) in [
            ("crossover probability", self.crossover_probability),
            ("mutation probability", self.mutation_probability),
            ("gene swap probability", self.gene_swap_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}
