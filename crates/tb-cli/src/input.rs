//! Timewarrior extension input.
//!
//! Timewarrior feeds extensions a block of `key: value` settings, a blank
//! line, and then the intervals of the requested range as a JSON array.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tb_core::timestamp::parse_timestamp;
use tb_core::{ReportWindow, TrackedInterval};

const REPORT_START: &str = "temp.report.start";
const REPORT_END: &str = "temp.report.end";
const BUDGET_FILE: &str = "budget.file";

/// Parsed extension input.
#[derive(Debug, Clone, Default)]
pub struct TimewInput {
    pub settings: BTreeMap<String, String>,
    pub intervals: Vec<TrackedInterval>,
}

impl TimewInput {
    /// Looks up a setting, treating an empty value as absent.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// The report range Timewarrior was asked for.
    pub fn report_window(&self) -> Result<ReportWindow> {
        let (Some(start), Some(end)) = (self.setting(REPORT_START), self.setting(REPORT_END)) else {
            anyhow::bail!("Report range not specified. Please specify a range or use a range hint.");
        };

        let start = parse_timestamp(start).with_context(|| format!("invalid {REPORT_START}"))?;
        let end = parse_timestamp(end).with_context(|| format!("invalid {REPORT_END}"))?;
        Ok(ReportWindow::new(start, end)?)
    }

    /// The `budget.file` setting, if present.
    pub fn budget_file(&self) -> Option<PathBuf> {
        self.setting(BUDGET_FILE).map(PathBuf::from)
    }
}

/// Splits a settings line on the first `": "`.
fn parse_config_line(line: &str) -> Option<(&str, &str)> {
    line.trim_end().split_once(": ")
}

/// Reads the settings block and the interval array.
pub fn parse_input<R: BufRead>(mut reader: R) -> Result<TimewInput> {
    let mut settings = BTreeMap::new();
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .context("failed to read configuration block")?;
        if read == 0 || line.trim().is_empty() {
            break;
        }
        match parse_config_line(&line) {
            Some((key, value)) => {
                settings.insert(key.to_string(), value.to_string());
            }
            None => tracing::debug!(line = line.trim_end(), "skipping setting without value"),
        }
    }
    tracing::debug!(settings = settings.len(), "read configuration block");

    let mut body = String::new();
    reader
        .read_to_string(&mut body)
        .context("failed to read intervals")?;
    let intervals: Vec<TrackedInterval> = if body.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(body.trim()).context("Could not load intervals. Syntax error?")?
    };
    tracing::debug!(intervals = intervals.len(), "read intervals");

    Ok(TimewInput {
        settings,
        intervals,
    })
}
