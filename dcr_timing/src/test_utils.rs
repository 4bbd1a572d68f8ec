use chrono::{DateTime, Duration, FixedOffset};

use crate::EventTable;

/// Reference point all test timestamps are relative to
pub fn base_time() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()
}

/// Midnight of the given day (relative to [`base_time`])
pub fn day(d: i64) -> DateTime<FixedOffset> {
    base_time() + Duration::days(d)
}

/// Given day and hour (relative to [`base_time`])
pub fn at(d: i64, hours: i64) -> DateTime<FixedOffset> {
    day(d) + Duration::hours(hours)
}

/// Build an event table from `(case, activity, day)` triples
pub fn table_from_days(records: &[(&str, &str, i64)]) -> EventTable {
    EventTable::from_events(records.iter().map(|(c, a, d)| (*c, *a, day(*d))))
}
