//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Compare tracked time against budgets.
///
/// Runs as a Timewarrior extension: Timewarrior writes its configuration and
/// the intervals of the requested range to standard input.
#[derive(Debug, Parser)]
#[command(name = "timew-budget", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Budget file to use instead of the `budget.file` setting.
    #[arg(short, long)]
    pub budget_file: Option<PathBuf>,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,
}
