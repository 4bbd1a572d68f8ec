//! Timing Analysis of DCR Relations
//!
//! Computes the empirical time distances (in days) between the two activities of timed DCR relations.
//!
//! The pipeline per [`ConstraintSpec`](crate::ConstraintSpec) is:
//! [`pair_filter`] → [`delta_extraction`] → [`deadline_resolution`] (deadlines only) → [`aggregation`].
pub mod aggregation;
pub mod deadline_resolution;
pub mod delta_extraction;
pub mod histogram;
pub mod pair_filter;
pub mod statistics;

#[doc(inline)]
pub use aggregation::{
    compute_timing, get_timings, get_timings_with_options, TimingOptions, TimingResult,
    TimingResults, MIN_SAMPLES,
};
#[doc(inline)]
pub use histogram::Histogram;
#[doc(inline)]
pub use statistics::{BoundMode, BoxPlotSummary, StatisticsError};
