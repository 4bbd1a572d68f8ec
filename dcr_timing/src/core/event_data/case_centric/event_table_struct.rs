use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

///
/// An event is the occurrence of an activity at a specific point in time
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Activity (i.e., event type) of the event
    pub activity: String,
    /// Timestamp of the event (timezone-aware)
    pub timestamp: DateTime<FixedOffset>,
}

impl Event {
    /// Create a new event with the provided activity and timestamp
    pub fn new<S: Into<String>>(activity: S, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            activity: activity.into(),
            timestamp,
        }
    }
}

///
/// A case (i.e., process instance) consists of an identifier and the events recorded for it
///
/// Cases created with [`Case::new`] or [`EventTable::from_events`], or deserialized, hold their events in chronological order.
/// Events with the same timestamp keep the order in which they were recorded.
/// Modifying `events` directly does not re-sort them.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "CaseData")]
pub struct Case {
    /// Case identifier
    pub id: String,
    /// Events of the case
    pub events: Vec<Event>,
}

#[derive(Deserialize)]
struct CaseData {
    id: String,
    events: Vec<Event>,
}

impl From<CaseData> for Case {
    fn from(data: CaseData) -> Self {
        Case::new(data.id, data.events)
    }
}

impl Case {
    /// Create a new case, sorting the given events chronologically
    ///
    /// Sorting is stable, so ties keep their original order.
    pub fn new<S: Into<String>>(id: S, mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self {
            id: id.into(),
            events,
        }
    }

    /// Timestamp of the first (chronological) occurrence of `activity` in this case
    pub fn first_occurrence_of(&self, activity: &str) -> Option<&DateTime<FixedOffset>> {
        self.events
            .iter()
            .filter(|e| e.activity == activity)
            .map(|e| &e.timestamp)
            .min()
    }

    /// Returns `true` if the case contains at least one event with the given activity
    pub fn contains_activity(&self, activity: &str) -> bool {
        self.events.iter().any(|e| e.activity == activity)
    }
}

///
/// Event table consisting of a list of [`Case`]s
///
/// This is the uniform, already parsed input of all timing analyses.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventTable {
    /// Cases contained in the table
    pub cases: Vec<Case>,
}

impl EventTable {
    /// Create an event table from already grouped cases
    pub fn new(cases: Vec<Case>) -> Self {
        Self { cases }
    }

    ///
    /// Build an event table from flat `(case id, activity, timestamp)` records
    ///
    /// Cases are created in order of their first appearance.
    /// Within a case, events are sorted chronologically while ties keep the order of the input records.
    ///
    pub fn from_events<C, A, I>(records: I) -> Self
    where
        C: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = (C, A, DateTime<FixedOffset>)>,
    {
        let mut case_index: HashMap<String, usize> = HashMap::new();
        let mut grouped: Vec<(String, Vec<Event>)> = Vec::new();
        for (case_id, activity, timestamp) in records {
            let case_id: String = case_id.into();
            let index = match case_index.get(&case_id) {
                Some(&index) => index,
                None => {
                    let next = grouped.len();
                    case_index.insert(case_id.clone(), next);
                    grouped.push((case_id, Vec::new()));
                    next
                }
            };
            grouped[index].1.push(Event::new(activity, timestamp));
        }
        Self {
            cases: grouped
                .into_iter()
                .map(|(id, events)| Case::new(id, events))
                .collect(),
        }
    }

    /// Get a case by its identifier
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    pub fn get_case(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// Total number of events over all cases
    pub fn num_events(&self) -> usize {
        self.cases.iter().map(|c| c.events.len()).sum()
    }

    /// Returns `true` if the table contains no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::day;

    #[test]
    fn test_from_events_groups_by_first_appearance() {
        let table = EventTable::from_events(vec![
            ("b", "x", day(1)),
            ("a", "x", day(0)),
            ("b", "y", day(0)),
        ]);
        let ids: Vec<&str> = table.cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(table.num_events(), 3);
    }

    #[test]
    fn test_case_sorting_is_stable() {
        let table = EventTable::from_events(vec![
            ("c", "late", day(4)),
            ("c", "tie-1", day(2)),
            ("c", "tie-2", day(2)),
            ("c", "early", day(0)),
        ]);
        let acts: Vec<&str> = table.cases[0]
            .events
            .iter()
            .map(|e| e.activity.as_str())
            .collect();
        assert_eq!(acts, vec!["early", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn test_deserialized_case_is_sorted() {
        let json = r#"{"id": "c", "events": [
            {"activity": "late", "timestamp": "2020-01-05T00:00:00+00:00"},
            {"activity": "tie-1", "timestamp": "2020-01-02T00:00:00+00:00"},
            {"activity": "early", "timestamp": "2020-01-01T00:00:00+00:00"},
            {"activity": "tie-2", "timestamp": "2020-01-02T00:00:00+00:00"}
        ]}"#;
        let case: Case = serde_json::from_str(json).unwrap();
        let acts: Vec<&str> = case.events.iter().map(|e| e.activity.as_str()).collect();
        assert_eq!(acts, vec!["early", "tie-1", "tie-2", "late"]);

        let table: EventTable =
            serde_json::from_str(&format!(r#"{{"cases": [{json}]}}"#)).unwrap();
        assert_eq!(table.cases[0], case);
    }

    #[test]
    fn test_first_occurrence() {
        let case = Case::new(
            "c",
            vec![
                Event::new("a", day(5)),
                Event::new("b", day(1)),
                Event::new("a", day(3)),
            ],
        );
        assert_eq!(case.first_occurrence_of("a"), Some(&day(3)));
        assert_eq!(case.first_occurrence_of("z"), None);
        assert!(case.contains_activity("b"));
    }
}
