/// Common identifying field for event identities (i.e., activities)
///
/// Used as the default activity column when importing flat event tables.
pub const ACTIVITY_NAME: &str = "concept:name";
/// Common identifying field for event timestamps
pub const TIMESTAMP_NAME: &str = "time:timestamp";
/// Prefix prepended to trace attribute keys when flattening an event log to events only
///
/// Primarily used only for interoperability with `PM4Py`
pub const TRACE_PREFIX: &str = "case:";
/// Constructed combination of [`TRACE_PREFIX`] and [`ACTIVITY_NAME`]
///
/// Column holding the case identifier in flat (e.g., CSV) event tables exported by `PM4Py`
pub const PREFIXED_TRACE_ID_NAME: &str = "case:concept:name";
