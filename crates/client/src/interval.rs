//! Histogram interval selection.
//!
//! Picks a human-legible bucket width from a fixed ladder instead of dividing
//! the span exactly, so bucket boundaries land on round values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SECOND: u64 = 1_000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// One rung of the interval ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalStep {
    /// Label in the cluster's fixed-interval syntax.
    pub label: &'static str,
    pub millis: u64,
}

const fn step(label: &'static str, millis: u64) -> IntervalStep {
    IntervalStep { label, millis }
}

/// Ascending ladder of bucket widths.
pub const INTERVAL_LADDER: [IntervalStep; 17] = [
    step("10ms", 10),
    step("100ms", 100),
    step("1s", SECOND),
    step("5s", 5 * SECOND),
    step("15s", 15 * SECOND),
    step("30s", 30 * SECOND),
    step("1m", MINUTE),
    step("5m", 5 * MINUTE),
    step("15m", 15 * MINUTE),
    step("30m", 30 * MINUTE),
    step("1h", HOUR),
    step("3h", 3 * HOUR),
    step("6h", 6 * HOUR),
    step("12h", 12 * HOUR),
    step("1d", DAY),
    step("7d", 7 * DAY),
    step("30d", 30 * DAY),
];

/// Choose the smallest ladder width that yields at most `target_buckets` buckets.
///
/// `from_ms` and `to_ms` are epoch milliseconds. A zero or negative span
/// yields the smallest width; spans too large for the ladder yield the largest.
/// A `target_buckets` of zero is treated as one.
pub fn choose_interval(from_ms: i64, to_ms: i64, target_buckets: u32) -> &'static str {
    let span = to_ms.saturating_sub(from_ms).max(0) as f64;
    let ideal = span / f64::from(target_buckets.max(1));

    INTERVAL_LADDER
        .iter()
        .find(|s| s.millis as f64 >= ideal)
        .map_or_else(widest_interval, |s| s.label)
}

/// Largest width on the ladder.
pub const fn widest_interval() -> &'static str {
    INTERVAL_LADDER[INTERVAL_LADDER.len() - 1].label
}

/// Parse a time bound into epoch milliseconds.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps
/// and bare dates (both read as UTC), and integer epoch milliseconds.
pub fn parse_time_bound(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(millis) = value.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_zero_span_is_smallest() {
        assert_eq!(choose_interval(NOW, NOW, 50), "10ms");
    }

    #[test]
    fn test_negative_span_is_smallest() {
        assert_eq!(choose_interval(NOW, NOW - 5_000, 50), "10ms");
    }

    #[test]
    fn test_one_minute_span() {
        // ideal = 1200ms, first rung >= 1200ms is 5s
        assert_eq!(choose_interval(NOW - 60_000, NOW, 50), "5s");
    }

    #[test]
    fn test_exact_rung_is_chosen() {
        // ideal = exactly one hour
        assert_eq!(choose_interval(0, 50 * HOUR as i64, 50), "1h");
    }

    #[test]
    fn test_typical_ranges() {
        assert_eq!(choose_interval(NOW - HOUR as i64, NOW, 50), "5m");
        assert_eq!(choose_interval(NOW - DAY as i64, NOW, 50), "30m");
        assert_eq!(choose_interval(NOW - 7 * DAY as i64, NOW, 50), "6h");
    }

    #[test]
    fn test_huge_span_is_largest() {
        assert_eq!(choose_interval(0, 100 * 365 * DAY as i64, 50), "30d");
    }

    #[test]
    fn test_widest_interval_is_last_rung() {
        assert_eq!(widest_interval(), "30d");
    }

    #[test]
    fn test_zero_target_does_not_divide_by_zero() {
        assert_eq!(choose_interval(0, 5_000, 0), "5s");
    }

    #[test]
    fn test_parse_time_bound_formats() {
        assert_eq!(parse_time_bound("1700000000000"), Some(NOW));
        assert_eq!(parse_time_bound("2023-11-14T22:13:20Z"), Some(NOW));
        assert_eq!(parse_time_bound("2023-11-14T22:13:20.000+00:00"), Some(NOW));
        assert_eq!(parse_time_bound("2023-11-14T22:13:20"), Some(NOW));
        assert_eq!(
            parse_time_bound("2023-11-14"),
            Some(NOW - (22 * HOUR + 13 * MINUTE + 20 * SECOND) as i64)
        );
        assert_eq!(parse_time_bound("now-15m"), None);
    }

    fn ladder_index(label: &str) -> usize {
        INTERVAL_LADDER
            .iter()
            .position(|s| s.label == label)
            .unwrap()
    }

    proptest! {
        #[test]
        fn prop_interval_monotonic_in_span(
            from in -1_000_000_000_000i64..2_000_000_000_000i64,
            a in 0i64..400_000_000_000i64,
            b in 0i64..400_000_000_000i64,
            target in 1u32..500,
        ) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            let narrow = choose_interval(from, from + short, target);
            let wide = choose_interval(from, from + long, target);
            prop_assert!(ladder_index(narrow) <= ladder_index(wide));
        }

        #[test]
        fn prop_interval_is_at_least_ideal_unless_largest(
            span in 0i64..400_000_000_000i64,
            target in 1u32..500,
        ) {
            let label = choose_interval(0, span, target);
            let step = INTERVAL_LADDER[ladder_index(label)];
            let ideal = span as f64 / f64::from(target);
            prop_assert!(step.millis as f64 >= ideal || label == "30d");
        }
    }
}
