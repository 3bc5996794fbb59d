//! Budget report rendering.
//!
//! Renders the per-tag comparison of tracked vs. budgeted time as a table
//! (human-readable) or as JSON.

use std::fmt::Write;
use std::io::BufRead;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};
use tb_core::{ReportTotals, ReportWindow, TagReport, TagResult, aggregate};

use crate::input::parse_input;
use crate::{Cli, Config, budget_file};

// ========== Formatting ==========

/// Formats seconds as `HH:MM:SS`. Hours are not capped at 24.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats a signed second count, prefixing `-` when negative.
pub fn format_signed_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    format!("{sign}{}", format_hms(seconds.unsigned_abs()))
}

/// Formats a utilization percentage with two decimals.
pub fn format_utilization(utilization: Option<f64>) -> String {
    utilization.map_or_else(|| "-".to_string(), |pct| format!("{pct:.2}%"))
}

fn format_period(window: &ReportWindow) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
    format!(
        "Budget report for period {} to {}",
        window.start().format(FORMAT),
        window.end().format(FORMAT)
    )
}

// ========== Table Output ==========

/// Table row for display.
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Time spent")]
    spent: String,
    #[tabled(rename = "Budgeted time")]
    budgeted: String,
    #[tabled(rename = "Budget surplus")]
    surplus: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

impl ReportRow {
    fn new(label: &str, result: &TagResult) -> Self {
        Self {
            tag: label.to_string(),
            spent: format_hms(result.actual_seconds),
            budgeted: format_hms(result.budgeted_seconds),
            surplus: format_signed_hms(result.net_seconds()),
            utilization: format_utilization(result.utilization()),
        }
    }

    fn blank() -> Self {
        Self {
            tag: String::new(),
            spent: String::new(),
            budgeted: String::new(),
            surplus: String::new(),
            utilization: String::new(),
        }
    }
}

/// Formats the human-readable report.
pub fn format_report(reports: &[TagReport], window: &ReportWindow) -> String {
    let mut output = String::new();

    if reports.is_empty() {
        writeln!(output, "No budgeted tags in this period.").unwrap();
    } else {
        let totals = ReportTotals::from_reports(reports);
        let mut rows: Vec<ReportRow> = reports
            .iter()
            .map(|report| ReportRow::new(&report.tag, &report.result))
            .collect();
        rows.push(ReportRow::blank());
        rows.push(ReportRow::new("Total", totals.result()));

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .with(Modify::new(Rows::first()).with(Alignment::left()))
            .to_string();
        writeln!(output, "{table}").unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "{}", format_period(window)).unwrap();
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub period: JsonPeriod,
    pub tags: Vec<JsonTagEntry>,
    pub totals: Option<JsonTotals>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct JsonTagEntry {
    pub tag: String,
    #[serde(flatten)]
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub budgeted_seconds: u64,
    pub actual_seconds: u64,
    pub net_seconds: i64,
    pub utilization: Option<f64>,
}

impl From<&TagResult> for JsonTotals {
    fn from(result: &TagResult) -> Self {
        Self {
            budgeted_seconds: result.budgeted_seconds,
            actual_seconds: result.actual_seconds,
            net_seconds: result.net_seconds(),
            utilization: result.utilization(),
        }
    }
}

/// Formats report data as JSON.
pub fn format_report_json(reports: &[TagReport], window: &ReportWindow) -> Result<String> {
    let totals = (!reports.is_empty())
        .then(|| JsonTotals::from(ReportTotals::from_reports(reports).result()));

    let report = JsonReport {
        period: JsonPeriod {
            start: window.start().to_rfc3339(),
            end: window.end().to_rfc3339(),
        },
        tags: reports
            .iter()
            .map(|report| JsonTagEntry {
                tag: report.tag.clone(),
                totals: JsonTotals::from(&report.result),
            })
            .collect(),
        totals,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report: reads Timewarrior input from `reader` and returns the
/// rendered report.
pub fn run<R: BufRead>(cli: &Cli, config: &Config, reader: R, now: DateTime<Utc>) -> Result<String> {
    let input = parse_input(reader)?;

    let path = budget_file::resolve_path(
        cli.budget_file.as_deref(),
        input.budget_file(),
        config.budget_file.as_deref(),
    )?;
    let catalog = budget_file::load_catalog(&path)?;
    let window = input.report_window()?;

    let reports = aggregate(&catalog, &input.intervals, &window, now);
    tracing::debug!(tags = reports.len(), "computed budget report");

    if cli.json {
        format_report_json(&reports, &window)
    } else {
        Ok(format_report(&reports, &window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;

    fn window() -> ReportWindow {
        ReportWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn report(tag: &str, budgeted_seconds: u64, actual_seconds: u64) -> TagReport {
        TagReport {
            tag: tag.to_string(),
            result: TagResult {
                budgeted_seconds,
                actual_seconds,
            },
        }
    }

    // ========== Duration Formatting Tests ==========

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(14_400), "04:00:00");
        assert_eq!(format_hms(3_725), "01:02:05");
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    #[test]
    fn test_format_signed_hms() {
        assert_eq!(format_signed_hms(72_000), "20:00:00");
        assert_eq!(format_signed_hms(-1_800), "-00:30:00");
        assert_eq!(format_signed_hms(0), "00:00:00");
    }

    #[test]
    fn test_format_utilization() {
        assert_eq!(format_utilization(Some(16.67)), "16.67%");
        assert_eq!(format_utilization(Some(125.0)), "125.00%");
        assert_eq!(format_utilization(None), "-");
    }

    // ========== Report Tests ==========

    #[test]
    fn test_report_rows_and_totals() {
        let output = format_report(
            &[report("work", 86_400, 14_400), report("reading", 3_600, 5_400)],
            &window(),
        );

        let work = output.lines().find(|l| l.contains("work")).unwrap();
        assert!(work.contains("04:00:00"));
        assert!(work.contains("24:00:00"));
        assert!(work.contains("20:00:00"));
        assert!(work.contains("16.67%"));

        let reading = output.lines().find(|l| l.contains("reading")).unwrap();
        assert!(reading.contains("-00:30:00"));
        assert!(reading.contains("150.00%"));

        let total = output.lines().find(|l| l.contains("Total")).unwrap();
        assert!(total.contains("05:30:00"));
        assert!(total.contains("25:00:00"));
        assert!(total.contains("19:30:00"));
        assert!(total.contains("22.00%"));
    }

    #[test]
    fn test_report_keeps_tag_order() {
        let output = format_report(&[report("zeta", 60, 0), report("alpha", 60, 0)], &window());
        assert!(output.find("zeta").unwrap() < output.find("alpha").unwrap());
    }

    #[test]
    fn test_report_ends_with_period() {
        let output = format_report(&[report("work", 60, 0)], &window());
        assert!(output.ends_with(
            "\nBudget report for period 2024-01-01 00:00:00+00:00 to 2024-01-04 00:00:00+00:00\n"
        ));
    }

    #[test]
    fn test_report_empty_period() {
        let output = format_report(&[], &window());
        assert_snapshot!(output, @r"
        No budgeted tags in this period.

        Budget report for period 2024-01-01 00:00:00+00:00 to 2024-01-04 00:00:00+00:00
        ");
    }

    #[test]
    fn test_report_json_output() {
        let output = format_report_json(&[report("work", 86_400, 14_400)], &window()).unwrap();
        assert_snapshot!(output, @r#"
        {
          "period": {
            "start": "2024-01-01T00:00:00+00:00",
            "end": "2024-01-04T00:00:00+00:00"
          },
          "tags": [
            {
              "tag": "work",
              "budgeted_seconds": 86400,
              "actual_seconds": 14400,
              "net_seconds": 72000,
              "utilization": 16.67
            }
          ],
          "totals": {
            "budgeted_seconds": 86400,
            "actual_seconds": 14400,
            "net_seconds": 72000,
            "utilization": 16.67
          }
        }
        "#);
    }

    #[test]
    fn test_report_json_empty_has_no_totals() {
        let output = format_report_json(&[], &window()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["totals"].is_null());
        assert_eq!(value["tags"], serde_json::json!([]));
    }
}
