//! Timewarrior budget report CLI library.
//!
//! This crate provides the extension shell around `tb-core`: reading
//! Timewarrior's stdin protocol, loading the budget file, and rendering the report.

pub mod budget_file;
mod cli;
mod config;
pub mod input;
pub mod report;

pub use cli::Cli;
pub use config::Config;
