//! Core domain logic for timew-budget.
//!
//! This crate contains the budget engine:
//! - Catalog: dated budget definitions per tag and per-day resolution
//! - Interval clipping: overlap of tracked intervals with the report window
//! - Aggregation: budgeted vs. actual seconds per tag over a report window

mod aggregate;
pub mod catalog;
mod error;
pub mod interval;
pub mod timestamp;

pub use aggregate::{ReportTotals, TagReport, TagResult, aggregate};
pub use catalog::{BudgetCatalog, BudgetDefinition, BudgetSource, BudgetSources, ExcludedDays};
pub use error::{CatalogError, TimestampError, WindowError};
pub use interval::{ReportWindow, TrackedInterval, overlap_seconds};
