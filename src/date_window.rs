//! # Date Window Module
//!
//! ## Purpose
//! Decides whether an entry is currently in force given its optional
//! start/end dates. Entries outside their window are excluded from every
//! search before any matching logic runs.
//!
//! ## Input/Output Specification
//! - **Input**: Entry start/end date strings (`yyyy-MM-dd`), the current date
//! - **Output**: Exclusion verdict
//! - **Malformed dates**: treated as "today", so a bad bound never excludes
//!   an entry on its own; occurrences are counted and logged for data-quality
//!   visibility

use crate::Entry;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};

/// Count of malformed entry dates seen since process start
static MALFORMED_DATES: AtomicU64 = AtomicU64::new(0);

/// Number of malformed entry dates encountered since process start
pub fn malformed_date_count() -> u64 {
    MALFORMED_DATES.load(Ordering::Relaxed)
}

/// Parse a `yyyy-MM-dd` bound, falling back to `today` when malformed.
///
/// The fallback keeps the comparison outcome neutral: `today` is never
/// strictly before or after itself, so a malformed bound cannot exclude.
fn parse_bound(raw: &str, today: NaiveDate) -> NaiveDate {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            MALFORMED_DATES.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("malformed entry date '{}', treating as today", raw);
            today
        }
    }
}

/// Check whether an entry is outside its active window on `today`.
///
/// Absent both bounds means always active. An entry is excluded when
/// `today` is strictly after its end date or strictly before its start
/// date, comparing calendar dates.
pub fn is_excluded(entry: &Entry, today: NaiveDate) -> bool {
    if entry.start_date.is_none() && entry.end_date.is_none() {
        return false;
    }

    if let Some(end) = entry.end_date.as_deref() {
        if today > parse_bound(end, today) {
            return true;
        }
    }

    if let Some(start) = entry.start_date.as_deref() {
        if today < parse_bound(start, today) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_window(start: Option<&str>, end: Option<&str>) -> Entry {
        Entry {
            name: "Test Subject".to_string(),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            ..Default::default()
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_no_bounds_never_excluded() {
        let entry = entry_with_window(None, None);
        assert!(!is_excluded(&entry, day("2024-06-15")));
    }

    #[test]
    fn test_excluded_after_end_date() {
        let entry = entry_with_window(None, Some("2000-01-01"));
        assert!(is_excluded(&entry, day("2024-06-15")));
    }

    #[test]
    fn test_active_on_end_date() {
        let entry = entry_with_window(None, Some("2024-06-15"));
        assert!(!is_excluded(&entry, day("2024-06-15")));
    }

    #[test]
    fn test_excluded_before_start_date() {
        let entry = entry_with_window(Some("2030-01-01"), None);
        assert!(is_excluded(&entry, day("2024-06-15")));
    }

    #[test]
    fn test_active_inside_window() {
        let entry = entry_with_window(Some("2020-01-01"), Some("2030-01-01"));
        assert!(!is_excluded(&entry, day("2024-06-15")));
    }

    #[test]
    fn test_malformed_end_date_does_not_exclude() {
        let before = malformed_date_count();
        let entry = entry_with_window(None, Some("not-a-date"));
        assert!(!is_excluded(&entry, day("2024-06-15")));
        assert!(malformed_date_count() > before);
    }

    #[test]
    fn test_malformed_start_date_does_not_exclude() {
        let entry = entry_with_window(Some("06/15/2024"), None);
        assert!(!is_excluded(&entry, day("2024-06-15")));
    }
}
