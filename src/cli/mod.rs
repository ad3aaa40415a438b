//! CLI command definitions and handlers

mod scan;
mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clarityscan - heuristic security analysis for Clarity contracts
#[derive(Parser, Debug)]
#[command(name = "clarityscan")]
#[command(
    version,
    about = "Heuristic security scanner and risk scorer for Clarity smart contracts",
    long_about = "Clarityscan runs a single-pass structural scan and a fixed rule set over \
Clarity contract source, blends in optional predictions from a remote model \
endpoint, and reports findings with a 0-100 risk score and a synthetic gas \
estimate.",
    after_help = "\
Examples:
  clarityscan scan contract.clar               Analyze one contract
  cat contract.clar | clarityscan scan -       Analyze stdin
  clarityscan scan contract.clar --format json JSON output for scripting
  clarityscan serve --port 8787                Start the HTTP API

Configuration is environment-driven; see CLARITYSCAN_* variables in the README."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a contract file (or stdin with `-`)
    Scan {
        /// Path to the contract source, or `-` for stdin
        file: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Run the HTTP scan API
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', default_value = "8787", env = "PORT")]
        port: u16,
    },
}

/// Execute the parsed command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { file, format } => scan::run(&file, &format),
        Commands::Serve { port } => serve::run(port),
    }
}
