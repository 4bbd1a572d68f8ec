//! Mining timing samples for all requested constraints of an [`EventTable`]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use itertools::Itertools;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    deadline_resolution::{has_unresolved_trailing_run, resolve_case_deadlines},
    delta_extraction::{extract_deltas, pair_samples, DeltaRow},
    histogram::Histogram,
    pair_filter::filter_cases_with_pair,
    statistics::{box_plot_summary, BoundMode, BoxPlotSummary},
};
use crate::core::{
    event_data::case_centric::EventTable,
    process_models::dcr::{ConstraintKind, ConstraintSpec},
};

/// Minimum statistics threshold: a result needs strictly more samples than this to be summarized
pub const MIN_SAMPLES: usize = 5;

/// Default factor of the IQR used for box plot whiskers
pub const DEFAULT_WHISKER_FACTOR: f64 = 1.5;

/// Options for [`get_timings_with_options`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimingOptions {
    /// Results with at most this many samples are not summarized
    pub min_samples: usize,
    /// Factor of the IQR used to determine box plot whiskers
    pub whisker_factor: f64,
    /// Lower end of the histogram range (in days), only used together with [`TimingOptions::histogram_max`]
    pub histogram_min: f64,
    /// Upper end of the histogram range (in days); if `None`, the sample range is used
    pub histogram_max: Option<f64>,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            min_samples: MIN_SAMPLES,
            whisker_factor: DEFAULT_WHISKER_FACTOR,
            histogram_min: 0.0,
            histogram_max: None,
        }
    }
}

impl TimingOptions {
    fn histogram_range(&self) -> Option<(f64, f64)> {
        self.histogram_max.map(|max| (self.histogram_min, max))
    }
}

impl ConstraintKind {
    ///
    /// Turn the delta rows of all qualifying cases into timing samples (in days)
    ///
    /// - [`ConstraintKind::MinDelay`]: the deltas of all `from → to` rows
    /// - [`ConstraintKind::MaxDeadline`]: the deltas of all `from → to` rows, after resolving each case with [`resolve_case_deadlines`]
    pub fn resolve(&self, case_rows: &[Vec<DeltaRow<'_>>], from: &str, to: &str) -> Vec<f64> {
        match self {
            ConstraintKind::MinDelay => pair_samples(case_rows.iter().flatten(), from, to),
            ConstraintKind::MaxDeadline => {
                let unresolved = case_rows
                    .iter()
                    .filter(|rows| has_unresolved_trailing_run(rows, from))
                    .count();
                if unresolved > 0 {
                    tracing::debug!(
                        from,
                        to,
                        cases = unresolved,
                        "dropping unresolved trailing runs"
                    );
                }
                let resolved: Vec<DeltaRow<'_>> = case_rows
                    .iter()
                    .flat_map(|rows| resolve_case_deadlines(rows))
                    .collect();
                pair_samples(&resolved, from, to)
            }
        }
    }
}

/// Timing samples mined for one [`ConstraintSpec`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimingResult {
    /// The analyzed constraint
    pub constraint: ConstraintSpec,
    /// Time distances in days (one per matching row over all qualifying cases)
    pub samples: Vec<f64>,
    /// Box plot summary of the samples; `None` if there are too few samples
    pub summary: Option<BoxPlotSummary>,
}

impl TimingResult {
    /// Returns `true` if there were enough samples to compute a summary
    pub fn is_sufficient(&self) -> bool {
        self.summary.is_some()
    }

    /// Delay or deadline bound to use for the constraint (see [`ConstraintKind::bound`])
    pub fn bound(&self, mode: BoundMode) -> Option<f64> {
        self.summary
            .as_ref()
            .map(|s| self.constraint.kind.bound(s, mode))
    }

    /// Histogram of the samples (with Freedman-Diaconis binning); `None` if there are too few samples
    pub fn histogram(&self, options: &TimingOptions) -> Option<Histogram> {
        if !self.is_sufficient() {
            return None;
        }
        Some(Histogram::with_freedman_diaconis(
            &self.samples,
            options.histogram_range(),
        ))
    }
}

/// Timing results for a list of constraints, in the order the constraints were requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimingResults {
    /// One result per distinct requested constraint
    pub results: Vec<TimingResult>,
}

impl TimingResults {
    /// Get the result for a constraint
    pub fn get(&self, constraint: &ConstraintSpec) -> Option<&TimingResult> {
        self.results.iter().find(|r| &r.constraint == constraint)
    }

    /// Iterate over all results
    pub fn iter(&self) -> impl Iterator<Item = &TimingResult> {
        self.results.iter()
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if no constraints were analyzed
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results with enough samples for a summary
    pub fn sufficient(&self) -> impl Iterator<Item = &TimingResult> {
        self.results.iter().filter(|r| r.is_sufficient())
    }

    /// Number of results without enough samples
    pub fn num_insufficient(&self) -> usize {
        self.results.iter().filter(|r| !r.is_sufficient()).count()
    }

    /// Bound per constraint with enough samples (see [`TimingResult::bound`])
    pub fn bounds(&self, mode: BoundMode) -> HashMap<ConstraintSpec, f64> {
        self.results
            .iter()
            .filter_map(|r| Some((r.constraint.clone(), r.bound(mode)?)))
            .collect()
    }

    /// Mean sample value per constraint with enough samples
    pub fn mean_values(&self) -> HashMap<ConstraintSpec, f64> {
        self.sufficient()
            .filter_map(|r| Some((r.constraint.clone(), r.summary?.mean)))
            .collect()
    }
}

///
/// Mine the timing samples of a single constraint
///
/// Cases without an ordered occurrence of the constraint's activities are skipped.
/// If there are not more than [`TimingOptions::min_samples`] samples, the result has no summary and a warning is logged.
pub fn compute_timing(
    table: &EventTable,
    constraint: &ConstraintSpec,
    options: &TimingOptions,
) -> TimingResult {
    let from = constraint.from_event.as_str();
    let to = constraint.to_event.as_str();
    let cases = filter_cases_with_pair(table, from, to);
    let case_rows = extract_deltas(&cases, from, to);
    let samples = constraint.kind.resolve(&case_rows, from, to);
    let summary = match box_plot_summary(&samples, options.min_samples, options.whisker_factor) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(constraint = %constraint, "{e}");
            None
        }
    };
    TimingResult {
        constraint: constraint.clone(),
        samples,
        summary,
    }
}

/// Mine timing samples for all given constraints with default [`TimingOptions`]
pub fn get_timings(table: &EventTable, constraints: &[ConstraintSpec]) -> TimingResults {
    get_timings_with_options(table, constraints, &TimingOptions::default())
}

///
/// Mine timing samples for all given constraints
///
/// Constraints are independent of each other and processed in parallel.
/// Results keep the order of the requested constraints; duplicates are only analyzed once.
/// An empty list of constraints yields empty results.
pub fn get_timings_with_options(
    table: &EventTable,
    constraints: &[ConstraintSpec],
    options: &TimingOptions,
) -> TimingResults {
    let distinct: Vec<&ConstraintSpec> = constraints.iter().unique().collect();
    let total = distinct.len();
    let done = AtomicUsize::new(0);
    let results: Vec<TimingResult> = distinct
        .par_iter()
        .map(|constraint| {
            let result = compute_timing(table, constraint, options);
            let i = done.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(
                samples = result.samples.len(),
                "Done for {constraint} {i}/{total}"
            );
            result
        })
        .collect();
    let results = TimingResults { results };
    tracing::info!(
        constraints = total,
        insufficient = results.num_insufficient(),
        "mined timings"
    );
    results
}
