//! Carried-maximum resolution of deadline deltas
//!
//! A deadline is at risk from the earliest occurrence in a run of repeated activities, not only from the one right before the closing activity.
//! Within a case, the maximum delta seen since the last window change is therefore carried forward
//! and attributed to the next cross-type row (where the window closes or reopens).
//!
//! Runs that are never closed before the case ends do not yield a row.
//! This means deadlines that were not met within the observed log window are not represented in the samples.

use super::delta_extraction::DeltaRow;

///
/// Resolve the deltas of the delta rows of a single case
///
/// Rows are processed in order while keeping a running maximum of their deltas.
/// Every cross-type row gets the running maximum as its delta, after which the maximum is reset to `0`.
/// Same-type rows are returned unchanged, they only contribute to the running maximum.
///
/// Returns a new sequence of rows; applying the function to its own output does not change the deltas of cross-type rows.
pub fn resolve_case_deadlines<'a>(rows: &[DeltaRow<'a>]) -> Vec<DeltaRow<'a>> {
    let mut max_days: i64 = 0;
    rows.iter()
        .map(|row| {
            max_days = max_days.max(row.delta);
            if row.is_cross_type() {
                let resolved = DeltaRow {
                    delta: max_days,
                    ..*row
                };
                max_days = 0;
                resolved
            } else {
                *row
            }
        })
        .collect()
}

/// Returns `true` if the case rows end with a run of `from` rows that is not closed by any cross-type row
///
/// A trailing run of target rows is not unresolved, since its deadline was already met.
pub fn has_unresolved_trailing_run(rows: &[DeltaRow<'_>], from: &str) -> bool {
    rows.last()
        .is_some_and(|row| !row.is_cross_type() && row.event_type == from)
}
