//! Restricting an [`EventTable`] to the cases in which an activity pair occurs in order

use crate::core::event_data::case_centric::{Case, EventTable};

/// Returns `true` if the first occurrence of `from` in the case is strictly followed by some occurrence of `to`
///
/// Cases without `from` never qualify. Equal timestamps do not count as preceding.
pub fn case_contains_ordered_pair(case: &Case, from: &str, to: &str) -> bool {
    let Some(first_from) = case.first_occurrence_of(from) else {
        return false;
    };
    case.events
        .iter()
        .any(|e| e.activity == to && e.timestamp > *first_from)
}

/// Get all cases of the table which contain an ordered occurrence of `from` before `to`
///
/// Qualifying cases are returned with all of their events and in table order.
pub fn filter_cases_with_pair<'a>(table: &'a EventTable, from: &str, to: &str) -> Vec<&'a Case> {
    table
        .cases
        .iter()
        .filter(|c| case_contains_ordered_pair(c, from, to))
        .collect()
}
