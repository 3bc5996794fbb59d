//! Tracked intervals, the report window, and clipping one to the other.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::WindowError;

/// A Timewarrior interval as exported to extensions.
///
/// Fields Timewarrior adds besides these (`id`, `annotation`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedInterval {
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub start: DateTime<Utc>,
    /// `None` while the interval is still being tracked.
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub end: Option<DateTime<Utc>>,
}

impl TrackedInterval {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// The half-open span `[start, end)` a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    /// Validates a report window.
    ///
    /// The window must end after it starts and its end date must be at least
    /// one calendar day after its start date.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::EndNotAfterStart { start, end });
        }
        if end.date_naive() - start.date_naive() < Duration::days(1) {
            return Err(WindowError::ShorterThanOneDay);
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Calendar dates the budget is counted for: the start date up to, but
    /// not including, the end date.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(move |d| *d < last)
    }
}

/// Seconds of `interval` that fall inside `window`.
///
/// Open intervals run until `now` or the window end, whichever is earlier.
/// Intervals that do not overlap the window contribute zero.
#[allow(clippy::cast_precision_loss)]
pub fn overlap_seconds(interval: &TrackedInterval, window: &ReportWindow, now: DateTime<Utc>) -> f64 {
    let start = interval.start.max(window.start);
    let end = interval.end.unwrap_or(now).min(window.end);

    if end <= start {
        return 0.0;
    }
    (end - start).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> TrackedInterval {
        TrackedInterval {
            tags: BTreeSet::from(["work".to_string()]),
            start,
            end: Some(end),
        }
    }

    fn open(start: DateTime<Utc>) -> TrackedInterval {
        TrackedInterval {
            tags: BTreeSet::from(["work".to_string()]),
            start,
            end: None,
        }
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> ReportWindow {
        ReportWindow::new(start, end).unwrap()
    }

    #[test]
    fn window_rejects_end_before_start() {
        let err = ReportWindow::new(at(2024, 1, 2, 0, 0), at(2024, 1, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, WindowError::EndNotAfterStart { .. }));
    }

    #[test]
    fn window_rejects_same_day_span() {
        let err = ReportWindow::new(at(2024, 1, 1, 0, 0), at(2024, 1, 1, 23, 59)).unwrap_err();
        assert_eq!(err, WindowError::ShorterThanOneDay);
    }

    #[test]
    fn window_dates_exclude_end_date() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 4, 0, 0));
        let dates: Vec<_> = w.dates().collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn closed_interval_inside_window_counts_fully() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 4, 0, 0));
        let i = closed(at(2024, 1, 1, 9, 0), at(2024, 1, 1, 13, 0));
        assert!((overlap_seconds(&i, &w, at(2024, 2, 1, 0, 0)) - 14_400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn interval_is_clipped_at_both_window_edges() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        let i = closed(at(2023, 12, 31, 23, 0), at(2024, 1, 2, 1, 0));
        assert!((overlap_seconds(&i, &w, at(2024, 2, 1, 0, 0)) - 86_400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn interval_outside_window_is_zero() {
        let w = window(at(2024, 1, 2, 0, 0), at(2024, 1, 3, 0, 0));
        let now = at(2024, 2, 1, 0, 0);

        let before = closed(at(2024, 1, 1, 9, 0), at(2024, 1, 1, 17, 0));
        assert!(overlap_seconds(&before, &w, now).abs() < f64::EPSILON);

        let after = closed(at(2024, 1, 3, 9, 0), at(2024, 1, 3, 17, 0));
        assert!(overlap_seconds(&after, &w, now).abs() < f64::EPSILON);
    }

    #[test]
    fn open_interval_is_clipped_to_now() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        let i = open(at(2024, 1, 1, 10, 0));
        assert!((overlap_seconds(&i, &w, at(2024, 1, 1, 10, 30)) - 1800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_interval_is_clipped_to_window_end_once_passed() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        let i = open(at(2024, 1, 1, 22, 0));
        assert!((overlap_seconds(&i, &w, at(2024, 1, 5, 0, 0)) - 7200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_interval_starting_after_now_is_zero() {
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        let i = open(at(2024, 1, 1, 12, 0));
        assert!(overlap_seconds(&i, &w, at(2024, 1, 1, 11, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn widening_window_never_decreases_overlap() {
        let i = closed(at(2024, 1, 1, 20, 0), at(2024, 1, 3, 4, 0));
        let now = at(2024, 2, 1, 0, 0);
        let windows = [
            window(at(2024, 1, 2, 0, 0), at(2024, 1, 3, 0, 0)),
            window(at(2024, 1, 1, 0, 0), at(2024, 1, 3, 0, 0)),
            window(at(2024, 1, 1, 0, 0), at(2024, 1, 4, 0, 0)),
            window(at(2023, 12, 1, 0, 0), at(2024, 2, 1, 0, 0)),
        ];

        let overlaps: Vec<f64> = windows.iter().map(|w| overlap_seconds(&i, w, now)).collect();
        assert!(overlaps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn deserializes_timewarrior_export() {
        let json = r#"[
            {"id":2,"start":"20240101T090000Z","end":"20240101T130000Z","tags":["work","client"]},
            {"id":1,"start":"20240102T100000Z","annotation":"still going"}
        ]"#;
        let intervals: Vec<TrackedInterval> = serde_json::from_str(json).unwrap();

        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].has_tag("client"));
        assert_eq!(intervals[0].end, Some(at(2024, 1, 1, 13, 0)));
        assert!(intervals[1].is_open());
        assert!(intervals[1].tags.is_empty());
    }
}
