use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use unshred_evolution::{
    Evolution, FitnessOracle as _, GenerationReport, RunParams, TerminationReason,
};

use crate::{command::params::ParamsArg, oracle::ShreddedStrips, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    #[clap(flatten)]
    params: ParamsArg,
    /// Seed used to shred the synthetic image
    #[arg(long, default_value_t = 0)]
    shred_seed: u64,
    /// Output file path for the run summary (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Do not print per-generation statistics
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct GenerationSummary {
    generation: usize,
    evaluated: usize,
    min: f64,
    max: f64,
    mean: f64,
    std_dev: f64,
}

impl From<&GenerationReport> for GenerationSummary {
    fn from(report: &GenerationReport) -> Self {
        Self {
            generation: report.generation,
            evaluated: report.evaluated,
            min: report.fitness.min,
            max: report.fitness.max,
            mean: report.fitness.mean,
            std_dev: report.fitness.std_dev,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    params: RunParams,
    shred_seed: u64,
    finished_at: DateTime<Utc>,
    reason: TerminationReason,
    generations: usize,
    best_genes: Vec<usize>,
    best_fitness: Option<f64>,
    best_ever_genes: Vec<usize>,
    best_ever_fitness: Option<f64>,
    history: Vec<GenerationSummary>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        params,
        shred_seed,
        output,
        quiet,
    } = arg;
    let params = params.resolve()?;
    let oracle = ShreddedStrips::new(params.genome_length, *shred_seed);

    tracing::info!(
        population = params.population_size,
        strips = params.genome_length,
        seed = params.seed,
        shred_seed,
        "start of evolution"
    );
    tracing::debug!(original = ?oracle.original(), "shredded image");

    let mut history = vec![];
    let outcome = Evolution::new(params.clone(), &oracle)?
        .run(|report| {
            if !quiet {
                print_report(report);
            }
            history.push(GenerationSummary::from(report));
        })
        .context("Evolution run failed")?;

    eprintln!("-- End of evolution ({}) --", outcome.reason);
    eprintln!(
        "Best individual is {:?}, {:?}",
        outcome.best.genes(),
        outcome.best.fitness()
    );
    if outcome.best_ever.fitness() < outcome.best.fitness() {
        eprintln!(
            "Best individual ever seen is {:?}, {:?}",
            outcome.best_ever.genes(),
            outcome.best_ever.fitness()
        );
    }
    oracle
        .show_solution(outcome.best.genes())
        .context("Failed to show the reconstructed image")?;

    let summary = RunSummary {
        params,
        shred_seed: *shred_seed,
        finished_at: Utc::now(),
        reason: outcome.reason,
        generations: outcome.generations,
        best_genes: outcome.best.genes().to_vec(),
        best_fitness: outcome.best.fitness(),
        best_ever_genes: outcome.best_ever.genes().to_vec(),
        best_ever_fitness: outcome.best_ever.fitness(),
        history,
    };
    Output::save_json(&summary, output.clone())?;

    if let Some(path) = output {
        eprintln!();
        eprintln!("Run summary saved");
        eprintln!("  Path: {}", path.display());
        eprintln!("  Generations: {}", summary.generations);
    }

    Ok(())
}

fn print_report(report: &GenerationReport) {
    let stats = &report.fitness;
    eprintln!("-- Generation {} --", report.generation);
    eprintln!("  Evaluated {} individuals", report.evaluated);
    eprintln!("  Min:  {:.3}", stats.min);
    eprintln!("  Max:  {:.3}", stats.max);
    eprintln!("  Mean: {:.3}", stats.mean);
    eprintln!("  Std:  {:.3}", stats.std_dev);
    eprintln!("  Best: {:?}", report.best.genes());
}
