//! Process Models
//!
//! Process model representations that timing results are fed back into.
pub mod dcr;

#[doc(inline)]
pub use dcr::DcrModel;
