#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod core;

#[cfg(test)]
pub(crate) mod test_utils;

#[doc(inline)]
pub use crate::core::event_data::case_centric::{Case, Event, EventTable};

#[doc(inline)]
pub use crate::core::process_models::dcr::{ConstraintKind, ConstraintSpec, DcrModel};

#[doc(inline)]
pub use crate::analysis::case_centric::timing::{
    get_timings, get_timings_with_options, BoxPlotSummary, TimingOptions, TimingResult,
    TimingResults, MIN_SAMPLES,
};

#[doc(inline)]
pub use crate::core::io::Importable;
