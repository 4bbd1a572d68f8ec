//! Pairing consecutive occurrences of two activities within a case

use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use serde::Serialize;

use crate::core::event_data::case_centric::{Case, Event};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days elapsed from `from` to `to` (floored)
pub fn days_between(from: &DateTime<FixedOffset>, to: &DateTime<FixedOffset>) -> i64 {
    (*to - *from).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

///
/// An occurrence of one of the two analyzed activities, paired with the chronologically next occurrence of either of them in the same case
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeltaRow<'a> {
    /// Case identifier
    pub case_id: &'a str,
    /// Activity of this occurrence
    pub event_type: &'a str,
    /// Timestamp of this occurrence
    pub timestamp: DateTime<FixedOffset>,
    /// Activity of the next occurrence
    pub next_event_type: &'a str,
    /// Timestamp of the next occurrence
    pub next_timestamp: DateTime<FixedOffset>,
    /// Whole days between this and the next occurrence
    pub delta: i64,
}

impl<'a> DeltaRow<'a> {
    fn between(case_id: &'a str, event: &'a Event, next: &'a Event) -> Self {
        Self {
            case_id,
            event_type: &event.activity,
            timestamp: event.timestamp,
            next_event_type: &next.activity,
            next_timestamp: next.timestamp,
            delta: days_between(&event.timestamp, &next.timestamp),
        }
    }

    /// Returns `true` if both occurrences have a different activity (i.e., a window is opened or closed)
    pub fn is_cross_type(&self) -> bool {
        self.event_type != self.next_event_type
    }

    /// Returns `true` if this row leads from `from` to `to`
    pub fn is_pair(&self, from: &str, to: &str) -> bool {
        self.event_type == from && self.next_event_type == to
    }
}

///
/// Extract the delta rows of a single case
///
/// Only events with activity `from` or `to` are considered.
/// They are ordered chronologically (ties keep case order) and each is paired with its successor.
/// The last occurrence has no successor and thus yields no row.
pub fn extract_case_deltas<'a>(case: &'a Case, from: &str, to: &str) -> Vec<DeltaRow<'a>> {
    let mut relevant: Vec<&'a Event> = case
        .events
        .iter()
        .filter(|e| e.activity == from || e.activity == to)
        .collect();
    relevant.sort_by_key(|e| e.timestamp);
    relevant
        .into_iter()
        .tuple_windows()
        .map(|(event, next)| DeltaRow::between(&case.id, event, next))
        .collect()
}

/// Extract the delta rows for each of the given cases (see [`extract_case_deltas`])
pub fn extract_deltas<'a>(cases: &[&'a Case], from: &str, to: &str) -> Vec<Vec<DeltaRow<'a>>> {
    cases
        .iter()
        .map(|case| extract_case_deltas(case, from, to))
        .collect()
}

/// Deltas (in days) of all rows leading from `from` to `to`, in row order
pub fn pair_samples<'r, 'a: 'r, I>(rows: I, from: &str, to: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'r DeltaRow<'a>>,
{
    rows.into_iter()
        .filter(|row| row.is_pair(from, to))
        .map(|row| row.delta as f64)
        .collect()
}
