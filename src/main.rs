use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
#[allow(unused_imports)]
use tracing::*;
use tracing_subscriber::prelude::*;

use crate::config::Configuration;

mod config;
mod model;
mod plan;
mod prompt;
mod shares;
mod split;
mod store;
mod suggest;
mod transaction;
mod validate;

/// Command line tool to split expense among your group
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adds a new transaction
    Transaction(transaction::Command),
    /// Suggests who pays whom across the stored trip
    Suggest(suggest::Command),
    /// Splits a bill among members
    Split(shares::Command),
    /// Checks that paid and shared totals match a bill
    Validate(validate::Command),
    /// Suggestions for a single plan or the whole trip
    Plan(plan::Command),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    fn get_rust_log(verbose: u8) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
            .into()
        })
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(get_rust_log(cli.verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Configuration::discover(cli.config.as_deref())?;
    debug!("{:?}", config);

    match &cli.command {
        Commands::Transaction(cmd) => transaction::execute_command(&config, cmd),
        Commands::Suggest(cmd) => suggest::execute_command(&config, cmd),
        Commands::Split(cmd) => shares::execute_command(&config, cmd),
        Commands::Validate(cmd) => validate::execute_command(cmd),
        Commands::Plan(cmd) => plan::execute_command(&config, cmd),
    }
}
