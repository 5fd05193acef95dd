//! cartledger - operator CLI over the cart ledger
//!
//! Opens the cart stored under ROOT/.cartledger, applies one command and
//! prints the resulting cart in the selected format.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = cli::config_from(&cli);

    // RUST_LOG wins over -q/-v; logs go to stderr so stdout stays parseable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.default_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli, &config)
}
