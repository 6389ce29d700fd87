//! `sp-validate` entry point

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sp_cli::{run_check, run_seed, CheckArgs, SeedArgs};

/// Validate SuperPlane component configurations against their schemas
#[derive(Parser, Debug)]
#[command(name = "sp-validate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a values file against a schema file
    Check(CheckArgs),

    /// Print the default value tree for a schema
    Seed(SeedArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &mut stdout),
        Commands::Seed(args) => run_seed(args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        },
    }
}
