//! Event Data
//!
//! Fundamental structs and adjacent utilities for timestamped case data
pub mod case_centric;
/// Shared timestamp parsing utilities
pub mod timestamp_utils;

#[doc(inline)]
pub use case_centric::EventTable;
