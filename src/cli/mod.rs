//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod render;
pub mod run;
pub mod submit;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vigia - live civic-report analytics dashboard.
#[derive(Parser, Debug)]
#[command(name = "vigia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live dashboard (foreground)
    Run(RunArgs),

    /// Submit a new report to the store
    Submit(SubmitArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `vigia check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Render the first complete dashboard and exit
    #[arg(long)]
    pub once: bool,
}

/// Arguments for the `submit` subcommand.
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Free-text description of the report
    #[arg(short, long)]
    pub description: String,

    /// Tag to attach; repeatable
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Neighborhood the report refers to
    #[arg(short = 'l', long)]
    pub location: Option<String>,
}
