//! Case-centric Event Data
pub mod constants;
pub mod csv_import;
#[doc(hidden)]
pub(crate) mod event_table_struct;
pub mod io;
pub mod xes_import;
#[doc(inline)]
pub use event_table_struct::*;
