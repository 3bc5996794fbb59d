//! Budget vs. actual aggregation.
//!
//! # Algorithm Summary
//!
//! For every tag in the catalog:
//! 1. Resolve the active budget on each date of the report window and sum the sizes
//! 2. Drop the tag if nothing was budgeted
//! 3. Sum the overlap of every interval carrying the tag with the window
//!
//! `now` is passed in rather than read from the clock so results depend only
//! on the arguments.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::BudgetCatalog;
use crate::interval::{ReportWindow, TrackedInterval, overlap_seconds};

/// Budgeted and tracked time for one tag, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagResult {
    pub budgeted_seconds: u64,
    pub actual_seconds: u64,
}

impl TagResult {
    /// Budgeted minus actual; negative when over budget.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn net_seconds(&self) -> i64 {
        self.budgeted_seconds as i64 - self.actual_seconds as i64
    }

    /// Actual as a percentage of budgeted, rounded to two decimals.
    ///
    /// `None` when nothing was budgeted.
    #[allow(clippy::cast_precision_loss)]
    pub fn utilization(&self) -> Option<f64> {
        if self.budgeted_seconds == 0 {
            return None;
        }
        let pct = self.actual_seconds as f64 / self.budgeted_seconds as f64 * 100.0;
        Some((pct * 100.0).round() / 100.0)
    }
}

/// Result row for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReport {
    pub tag: String,
    #[serde(flatten)]
    pub result: TagResult,
}

/// Sums across all reported tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals(TagResult);

impl ReportTotals {
    pub fn from_reports(reports: &[TagReport]) -> Self {
        let mut total = TagResult::default();
        for report in reports {
            total.budgeted_seconds += report.result.budgeted_seconds;
            total.actual_seconds += report.result.actual_seconds;
        }
        Self(total)
    }

    pub const fn result(&self) -> &TagResult {
        &self.0
    }
}

/// Rounds a non-negative second count to the nearest whole second.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    seconds.round().max(0.0) as u64
}

/// Computes budgeted and actual seconds per tag over `window`.
///
/// Tags come back in catalog order. Tags without any budgeted time in the
/// window are omitted; intervals whose tags are not in the catalog are never
/// counted.
pub fn aggregate(
    catalog: &BudgetCatalog,
    intervals: &[TrackedInterval],
    window: &ReportWindow,
    now: DateTime<Utc>,
) -> Vec<TagReport> {
    let mut reports = Vec::new();

    for tag in catalog.tags() {
        let budgeted: f64 = window
            .dates()
            .filter_map(|date| catalog.resolve(tag, date))
            .map(|definition| definition.size_seconds)
            .sum();

        let budgeted_seconds = whole_seconds(budgeted);
        if budgeted_seconds == 0 {
            tracing::debug!(tag, "no budget in report window, skipping");
            continue;
        }

        let actual: f64 = intervals
            .iter()
            .filter(|interval| interval.has_tag(tag))
            .map(|interval| overlap_seconds(interval, window, now))
            .sum();
        let actual_seconds = whole_seconds(actual);

        tracing::debug!(tag, budgeted_seconds, actual_seconds, "aggregated tag");
        reports.push(TagReport {
            tag: tag.to_string(),
            result: TagResult {
                budgeted_seconds,
                actual_seconds,
            },
        });
    }

    reports
}
