use std::path::PathBuf;

use unshred_evolution::RunParams;

use crate::util::{self, Output};

/// Run parameter overrides shared by every command that starts a run.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ParamsArg {
    /// JSON file with run parameters; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of individuals per generation
    #[arg(long)]
    population: Option<usize>,
    /// Number of image strips
    #[arg(long)]
    strips: Option<usize>,
    /// Probability of crossing a pair of offspring
    #[arg(long)]
    crossover_probability: Option<f64>,
    /// Probability of attempting mutation on an offspring
    #[arg(long)]
    mutation_probability: Option<f64>,
    /// Probability of swapping each strip during a mutation
    #[arg(long)]
    gene_swap_probability: Option<f64>,
    /// Number of contestants per tournament
    #[arg(long)]
    tournament_size: Option<usize>,
    /// Maximum number of generations
    #[arg(long)]
    max_generations: Option<usize>,
    /// Stop once the best fitness is at or below this value
    #[arg(long)]
    target_fitness: Option<f64>,
    /// Seed of the search
    #[arg(long)]
    seed: Option<u64>,
    /// Evaluate individuals one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

impl ParamsArg {
    /// Builds the run parameters: defaults, then the config file, then flags.
    pub(crate) fn resolve(&self) -> anyhow::Result<RunParams> {
        let mut params = match &self.config {
            Some(path) => util::read_params_file(path)?,
            None => RunParams::default(),
        };
        let Self {
            config: _,
            population,
            strips,
            crossover_probability,
            mutation_probability,
            gene_swap_probability,
            tournament_size,
            max_generations,
            target_fitness,
            seed,
            sequential,
        } = self;

        override_with(&mut params.population_size, *population);
        override_with(&mut params.genome_length, *strips);
        override_with(&mut params.crossover_probability, *crossover_probability);
        override_with(&mut params.mutation_probability, *mutation_probability);
        override_with(&mut params.gene_swap_probability, *gene_swap_probability);
        override_with(&mut params.tournament_size, *tournament_size);
        override_with(&mut params.max_generations, *max_generations);
        override_with(&mut params.target_fitness, *target_fitness);
        override_with(&mut params.seed, *seed);
        if *sequential {
            params.parallel_evaluation = false;
        }

        params.validate()?;
        Ok(params)
    }
}

fn override_with<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

pub(crate) fn run(arg: &ParamsArg) -> anyhow::Result<()> {
    let params = arg.resolve()?;
    Output::save_json(&params, None)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        params: ParamsArg,
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["unshred"]);
        assert_eq!(cli.params.resolve().unwrap(), RunParams::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "unshred",
            "--strips",
            "12",
            "--population",
            "40",
            "--gene-swap-probability",
            "0.1",
            "--seed",
            "99",
            "--sequential",
        ]);
        let params = cli.params.resolve().unwrap();
        assert_eq!(params.genome_length, 12);
        assert_eq!(params.population_size, 40);
        assert_eq!(params.gene_swap_probability, 0.1);
        assert_eq!(params.seed, 99);
        assert!(!params.parallel_evaluation);
        assert_eq!(params.tournament_size, 3);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let cli = Cli::parse_from(["unshred", "--crossover-probability", "1.5"]);
        assert!(cli.params.resolve().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["unshred", "--config", "/nonexistent/unshred.json"]);
        let err = cli.params.resolve().unwrap_err();
        assert!(err.to_string().contains("Failed to open run parameters file"));
    }
}
