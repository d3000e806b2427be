mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run_app(cli) {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_app(cli: Cli) -> Result<()> {
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("🚀 ligdock v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let result = commands::run::run(cli.run, cli.quiet);

    match &result {
        Ok(_) => info!("✅ Batch completed successfully."),
        Err(CliError::Engine(e)) if e.is_preflight() => error!("❌ Pre-flight failed: {}", e),
        Err(e) => error!("❌ Batch failed: {}", e),
    }

    result
}
