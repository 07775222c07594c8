//! pppm CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pppm_cli::cmd::{self, Globals};
use pppm_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let globals = Globals {
        verbose: cli.verbose,
        workdir: cli.workdir,
        standard: cli.standard,
    };

    match cli.command {
        Commands::Status => cmd::status::status(&globals),
        Commands::Classify { versions } => cmd::classify::classify(&versions),
        Commands::Check { script, usage } => cmd::check::check(&globals, &script, usage),
        Commands::Probe { exe, json } => cmd::probe::probe(&exe, json),
        Commands::Target { module, json } => cmd::target::target(&globals, &module, json),
    }
}
