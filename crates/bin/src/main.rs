use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paramtree=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Show(args) => commands::show::run(args),
        Commands::Flatten(args) => commands::show::run_flatten(args),
        Commands::Diff(args) => commands::diff::run(args),
        Commands::Set(args) => commands::set::run(args),
        Commands::Overlay(args) => commands::overlay::run(args),
        Commands::Info(args) => commands::info::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
