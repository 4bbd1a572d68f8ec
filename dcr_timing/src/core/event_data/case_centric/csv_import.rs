//! CSV Import for [`EventTable`]s
//!
//! Reads flat event tables with one event per row, as exported by `PM4Py` (`;`-separated by default).

use std::io::Read;

use chrono::{DateTime, FixedOffset};

use super::{
    io::{EventTableIOError, EventTableImportOptions},
    EventTable,
};
use crate::core::event_data::timestamp_utils::parse_timestamp;

/// Find the index of a header, ignoring surrounding whitespace
fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, EventTableIOError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| EventTableIOError::MissingColumn(name.to_string()))
}

/// Import an [`EventTable`] from a CSV reader with default options
pub fn import_csv_event_table(reader: impl Read) -> Result<EventTable, EventTableIOError> {
    import_csv_event_table_with_options(reader, &EventTableImportOptions::default())
}

/// Import an [`EventTable`] from a CSV reader
///
/// Any timestamp that cannot be parsed aborts the import with [`EventTableIOError::InvalidTimestamp`].
pub fn import_csv_event_table_with_options(
    reader: impl Read,
    options: &EventTableImportOptions,
) -> Result<EventTable, EventTableIOError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let case_col = find_column(&headers, &options.case_column)?;
    let act_col = find_column(&headers, &options.activity_column)?;
    let ts_col = find_column(&headers, &options.timestamp_column)?;
    let date_fmt = options.date_format.as_deref();

    let mut records: Vec<(String, String, DateTime<FixedOffset>)> = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is row 1
        let row = row_idx + 2;
        let field = |col: usize| record.get(col).unwrap_or_default().trim();
        let raw_time = field(ts_col);
        let timestamp =
            parse_timestamp(raw_time, date_fmt).ok_or_else(|| EventTableIOError::InvalidTimestamp {
                row,
                value: raw_time.to_string(),
            })?;
        records.push((field(case_col).to_string(), field(act_col).to_string(), timestamp));
    }
    let table = EventTable::from_events(records);
    tracing::debug!(
        cases = table.cases.len(),
        events = table.num_events(),
        "imported CSV event table"
    );
    Ok(table)
}
