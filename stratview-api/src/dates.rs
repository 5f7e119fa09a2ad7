//! Date-range resolution and validation.
//!
//! User-entered ranges are normalized against "today" before any query is
//! built: future dates, reversed bounds, and oversized spans are clamped to a
//! safe window rather than failing the request. Comparison mode uses the
//! stricter [`validate`] gate instead, which rejects instead of clamping.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Widest range the backend will be asked for, in days.
pub const MAX_SPAN_DAYS: u64 = 365;

/// Width of the fallback window used when input is unusable, in days.
pub const DEFAULT_SPAN_DAYS: u64 = 30;

/// A resolved, safe (start, end) pair: start <= end <= today, span <= 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// ISO `YYYY-MM-DD` start date for query construction.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// ISO `YYYY-MM-DD` end date for query construction.
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Hard validation failures, used by the comparison-mode gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("unparseable date: {0:?}")]
    Unparseable(String),

    #[error("cannot analyze future dates: {0} is after today ({1})")]
    FutureDate(NaiveDate, NaiveDate),

    #[error("start date {0} is after end date {1}")]
    StartAfterEnd(NaiveDate, NaiveDate),
}

/// Parse `MM/DD/YYYY` or `YYYY-MM-DD` input, trimmed. Empty or malformed
/// input yields `None`.
pub fn parse_input(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let fmt = if raw.contains('/') { "%m/%d/%Y" } else { "%Y-%m-%d" };
    NaiveDate::parse_from_str(raw, fmt).ok()
}

/// The last-30-days-ending-yesterday fallback window.
pub fn default_window(today: NaiveDate) -> DateRange {
    let end = today - Days::new(1);
    DateRange {
        start: end - Days::new(DEFAULT_SPAN_DAYS),
        end,
    }
}

/// Resolve a raw (start, end) pair into a safe range.
///
/// Never fails: unusable input degrades to the default window and emits a
/// diagnostic instead. The output always satisfies
/// start <= end <= today and span <= [`MAX_SPAN_DAYS`].
pub fn resolve(
    start_raw: &str,
    end_raw: &str,
    today: NaiveDate,
    diag: &dyn Diagnostics,
) -> DateRange {
    let fallback = default_window(today);

    let mut start = match parse_input(start_raw) {
        Some(d) => d,
        None => {
            if !start_raw.trim().is_empty() {
                diag.adjustment("dates", &format!("unparseable start date {start_raw:?}, using default window"));
            }
            fallback.start
        }
    };
    let mut end = match parse_input(end_raw) {
        Some(d) => d,
        None => {
            if !end_raw.trim().is_empty() {
                diag.adjustment("dates", &format!("unparseable end date {end_raw:?}, using default window"));
            }
            fallback.end
        }
    };

    if start > today || end > today {
        diag.adjustment("dates", "future dates detected, using last 30 days");
        start = fallback.start;
        end = fallback.end;
    }

    if start > end {
        diag.adjustment("dates", "start date after end date, swapping");
        std::mem::swap(&mut start, &mut end);
    }

    if (end - start).num_days() > MAX_SPAN_DAYS as i64 {
        diag.adjustment(
            "dates",
            &format!("date range exceeds {MAX_SPAN_DAYS} days, pulling start forward"),
        );
        start = end - Days::new(MAX_SPAN_DAYS);
    }

    DateRange { start, end }
}

/// Strict gate used by comparison mode: future dates and reversed bounds
/// block the request instead of being corrected.
pub fn validate(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<(), DateRangeError> {
    if start > today {
        return Err(DateRangeError::FutureDate(start, today));
    }
    if end > today {
        return Err(DateRangeError::FutureDate(end, today));
    }
    if start > end {
        return Err(DateRangeError::StartAfterEnd(start, end));
    }
    Ok(())
}

/// Gate variant for raw user input. Empty fields take the default-window
/// side so the gate can run with no dates entered; non-empty garbage is a
/// hard error here, unlike [`resolve`].
pub fn validate_raw(
    start_raw: &str,
    end_raw: &str,
    today: NaiveDate,
) -> Result<DateRange, DateRangeError> {
    let fallback = default_window(today);
    let start = match parse_input(start_raw) {
        Some(d) => d,
        None if start_raw.trim().is_empty() => fallback.start,
        None => return Err(DateRangeError::Unparseable(start_raw.to_string())),
    };
    let end = match parse_input(end_raw) {
        Some(d) => d,
        None if end_raw.trim().is_empty() => fallback.end,
        None => return Err(DateRangeError::Unparseable(end_raw.to_string())),
    };
    validate(start, end, today)?;
    Ok(DateRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: fn() -> NaiveDate = || d(2024, 6, 15);

    #[test]
    fn parses_both_formats() {
        assert_eq!(parse_input("2023-01-05"), Some(d(2023, 1, 5)));
        assert_eq!(parse_input("01/05/2023"), Some(d(2023, 1, 5)));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("next tuesday"), None);
        assert_eq!(parse_input("2023-13-05"), None);
    }

    #[test]
    fn valid_range_passes_through_unchanged() {
        let range = resolve("2024-01-10", "2024-02-10", TODAY(), &NullDiagnostics);
        assert_eq!(range.start, d(2024, 1, 10));
        assert_eq!(range.end, d(2024, 2, 10));
    }

    #[test]
    fn resolve_is_idempotent() {
        let first = resolve("2024-01-10", "2024-02-10", TODAY(), &NullDiagnostics);
        let again = resolve(&first.start_param(), &first.end_param(), TODAY(), &NullDiagnostics);
        assert_eq!(first, again);
    }

    #[test]
    fn empty_input_defaults_to_last_30_days() {
        let range = resolve("", "", TODAY(), &NullDiagnostics);
        assert_eq!(range.end, d(2024, 6, 14)); // yesterday
        assert_eq!(range.span_days(), DEFAULT_SPAN_DAYS as i64);
    }

    #[test]
    fn future_dates_fall_back_to_default_window() {
        let range = resolve("2025-01-01", "2025-02-01", TODAY(), &NullDiagnostics);
        assert_eq!(range, default_window(TODAY()));
    }

    #[test]
    fn one_future_date_discards_both() {
        let range = resolve("2024-01-01", "2025-01-01", TODAY(), &NullDiagnostics);
        assert_eq!(range, default_window(TODAY()));
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let range = resolve("2024-02-10", "2024-01-10", TODAY(), &NullDiagnostics);
        assert_eq!(range.start, d(2024, 1, 10));
        assert_eq!(range.end, d(2024, 2, 10));
    }

    #[test]
    fn swap_matches_ordered_input() {
        let swapped = resolve("2024-02-10", "2024-01-10", TODAY(), &NullDiagnostics);
        let ordered = resolve("2024-01-10", "2024-02-10", TODAY(), &NullDiagnostics);
        assert_eq!(swapped, ordered);
    }

    #[test]
    fn oversized_span_pulls_start_forward() {
        let range = resolve("2021-01-01", "2024-01-01", TODAY(), &NullDiagnostics);
        assert_eq!(range.end, d(2024, 1, 1));
        assert_eq!(range.span_days(), MAX_SPAN_DAYS as i64);
    }

    #[test]
    fn query_params_are_iso() {
        let range = resolve("01/05/2023", "01/20/2023", TODAY(), &NullDiagnostics);
        assert_eq!(range.start_param(), "2023-01-05");
        assert_eq!(range.end_param(), "2023-01-20");
    }

    #[test]
    fn gate_rejects_future_dates() {
        assert!(matches!(
            validate(d(2024, 1, 1), d(2025, 1, 1), TODAY()),
            Err(DateRangeError::FutureDate(_, _))
        ));
    }

    #[test]
    fn gate_rejects_reversed_bounds() {
        assert!(matches!(
            validate(d(2024, 3, 1), d(2024, 2, 1), TODAY()),
            Err(DateRangeError::StartAfterEnd(_, _))
        ));
    }

    #[test]
    fn gate_accepts_valid_range() {
        let range = validate_raw("2024-01-01", "2024-02-01", TODAY()).unwrap();
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, d(2024, 2, 1));
    }

    #[test]
    fn gate_rejects_garbage() {
        assert!(matches!(
            validate_raw("soon", "2024-02-01", TODAY()),
            Err(DateRangeError::Unparseable(_))
        ));
    }

    #[test]
    fn gate_defaults_empty_fields_to_the_default_window() {
        let range = validate_raw("", "", TODAY()).unwrap();
        assert_eq!(range, default_window(TODAY()));
    }
}
