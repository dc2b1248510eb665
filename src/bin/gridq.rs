//! gridq CLI - tabular Q-learning on the reference grid world
//!
//! - `train` runs automatic ε-greedy training for a number of episodes
//! - `play` moves the agent from keyboard input while the table learns

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gridq")]
#[command(version, about = "Tabular Q-learning on a grid world", long_about = None)]
struct Cli {
    /// Log every action choice and value update
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train automatically with the exploration policy
    Train(gridq::cli::commands::train::TrainArgs),

    /// Choose the agent's moves by hand
    Play(gridq::cli::commands::play::PlayArgs),
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Train(args) => gridq::cli::commands::train::execute(args),
        Commands::Play(args) => gridq::cli::commands::play::execute(args),
    }
}
