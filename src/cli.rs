use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Palmer drought index engine.
#[derive(Parser)]
#[command(
    name = "palmer",
    version,
    about = "Self-calibrating Palmer drought indices (PDSI, PHDI, WPLM, Z-index, CMI)"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the drought indices for every station in the config.
    Run(RunArgs),
    /// Validate the config and station inputs without computing.
    Check(CheckArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "palmer.toml")]
    pub config: PathBuf,

    /// Override output JSON path from config. Without either, results go
    /// to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "palmer.toml")]
    pub config: PathBuf,
}
