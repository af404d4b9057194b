use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{params::ParamsArg, run::RunArg};

mod params;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Reconstruct a shredded image with the genetic algorithm
    Run(#[clap(flatten)] RunArg),
    /// Print the effective run parameters as JSON
    Params(#[clap(flatten)] ParamsArg),
}

pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Params(arg) => params::run(&arg)?,
    }
    Ok(())
}

/// Installs a stderr logger filtered by `RUST_LOG` (default: `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
