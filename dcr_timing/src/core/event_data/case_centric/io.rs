//! IO implementations for [`EventTable`]

use std::io::{BufReader, Read};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::constants::{ACTIVITY_NAME, PREFIXED_TRACE_ID_NAME, TIMESTAMP_NAME, TRACE_PREFIX};
use super::csv_import::import_csv_event_table_with_options;
use super::xes_import::import_xes_event_table_with_options;
use super::EventTable;
use crate::core::io::Importable;

///
/// Options for importing an [`EventTable`] from CSV or XES
///
/// Column names refer to the flattened (`PM4Py`-style) view of a log.
/// For XES, the case column names a trace attribute, with or without the [`TRACE_PREFIX`].
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EventTableImportOptions {
    /// Field delimiter (CSV only)
    pub delimiter: u8,
    /// Column (or trace attribute) holding case identifiers
    pub case_column: String,
    /// Column (or event attribute) holding activity names
    pub activity_column: String,
    /// Column (or event attribute) holding event timestamps
    pub timestamp_column: String,
    /// Optional date format to try first when parsing timestamps
    pub date_format: Option<String>,
}

impl Default for EventTableImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            case_column: PREFIXED_TRACE_ID_NAME.to_string(),
            activity_column: ACTIVITY_NAME.to_string(),
            timestamp_column: TIMESTAMP_NAME.to_string(),
            date_format: None,
        }
    }
}

impl EventTableImportOptions {
    /// Key of the trace attribute holding the case identifier in XES
    pub fn trace_id_key(&self) -> &str {
        self.case_column
            .strip_prefix(TRACE_PREFIX)
            .unwrap_or(&self.case_column)
    }
}

/// Error type for [`EventTable`] IO operations
#[derive(Debug)]
pub enum EventTableIOError {
    /// IO Error
    Io(std::io::Error),
    /// CSV Parsing Error
    Csv(csv::Error),
    /// JSON Parsing Error
    Json(serde_json::Error),
    /// XML Parsing Error (XES)
    Xml(quick_xml::Error),
    /// Missing required column
    MissingColumn(String),
    /// Timestamp that could not be parsed
    InvalidTimestamp {
        /// Row number (1-based, including the header row) for CSV, event number (1-based) for XES
        row: usize,
        /// The invalid timestamp value
        value: String,
    },
    /// XES event without a required attribute
    MissingAttribute {
        /// Event number (1-based, over the whole log)
        event: usize,
        /// Key of the missing attribute
        key: String,
    },
    /// Unsupported Format
    UnsupportedFormat(String),
}

impl std::fmt::Display for EventTableIOError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTableIOError::Io(e) => write!(f, "IO Error: {e}"),
            EventTableIOError::Csv(e) => write!(f, "CSV Error: {e}"),
            EventTableIOError::Json(e) => write!(f, "JSON Error: {e}"),
            EventTableIOError::Xml(e) => write!(f, "XML Error: {e}"),
            EventTableIOError::MissingColumn(col) => write!(f, "Missing required column: {col}"),
            EventTableIOError::InvalidTimestamp { row, value } => {
                write!(f, "Invalid timestamp at row {row}: '{value}'")
            }
            EventTableIOError::MissingAttribute { event, key } => {
                write!(f, "Missing attribute '{key}' on event {event}")
            }
            EventTableIOError::UnsupportedFormat(s) => write!(f, "Unsupported Format: {s}"),
        }
    }
}

impl std::error::Error for EventTableIOError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EventTableIOError::Io(e) => Some(e),
            EventTableIOError::Csv(e) => Some(e),
            EventTableIOError::Json(e) => Some(e),
            EventTableIOError::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EventTableIOError {
    fn from(e: std::io::Error) -> Self {
        EventTableIOError::Io(e)
    }
}

impl From<csv::Error> for EventTableIOError {
    fn from(e: csv::Error) -> Self {
        EventTableIOError::Csv(e)
    }
}

impl From<serde_json::Error> for EventTableIOError {
    fn from(e: serde_json::Error) -> Self {
        EventTableIOError::Json(e)
    }
}

impl From<quick_xml::Error> for EventTableIOError {
    fn from(e: quick_xml::Error) -> Self {
        EventTableIOError::Xml(e)
    }
}

impl Importable for EventTable {
    type Error = EventTableIOError;
    type ImportOptions = EventTableImportOptions;

    fn import_from_reader_with_options<R: Read>(
        reader: R,
        format: &str,
        options: Self::ImportOptions,
    ) -> Result<Self, Self::Error> {
        match format {
            _ if format.ends_with("json") => Ok(serde_json::from_reader(reader)?),
            _ if format.ends_with("csv.gz") => {
                let gz = flate2::read::GzDecoder::new(reader);
                import_csv_event_table_with_options(gz, &options)
            }
            _ if format.ends_with("csv") => import_csv_event_table_with_options(reader, &options),
            _ if format.ends_with("xes.gz") => {
                let gz = flate2::read::GzDecoder::new(reader);
                import_xes_event_table_with_options(BufReader::new(gz), &options)
            }
            _ if format.ends_with("xes") => {
                import_xes_event_table_with_options(BufReader::new(reader), &options)
            }
            _ => Err(EventTableIOError::UnsupportedFormat(format.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use super::*;
    use crate::test_utils::day;

    const CSV: &str = "case:concept:name;concept:name;time:timestamp\n1;a;2021-03-01T10:00:00Z\n1;b;2021-03-03T09:00:00Z\n";

    #[test]
    fn test_import_csv_gz_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(CSV.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let table = EventTable::import_from_path(&path).unwrap();
        assert_eq!(table.num_events(), 2);
    }

    #[test]
    fn test_import_xes_gz_from_path() {
        let xes = r#"<log>
  <trace>
    <string key="concept:name" value="1"/>
    <event><string key="concept:name" value="a"/><date key="time:timestamp" value="2021-03-01T10:00:00.000+01:00"/></event>
    <event><string key="concept:name" value="b"/><date key="time:timestamp" value="2021-03-03T09:00:00.000+01:00"/></event>
  </trace>
</log>"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.xes.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(xes.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let table = EventTable::import_from_path(&path).unwrap();
        assert_eq!(table.get_case("1").unwrap().events.len(), 2);
        let plain = EventTable::import_from_bytes(xes.as_bytes(), "xes").unwrap();
        assert_eq!(table, plain);
    }

    #[test]
    fn test_trace_id_key() {
        assert_eq!(EventTableImportOptions::default().trace_id_key(), "concept:name");
        let options = EventTableImportOptions {
            case_column: "case_id".into(),
            ..Default::default()
        };
        assert_eq!(options.trace_id_key(), "case_id");
    }

    #[test]
    fn test_json_round_trip() {
        let table = EventTable::from_events(vec![("1", "a", day(0)), ("1", "b", day(2))]);
        let json = serde_json::to_vec(&table).unwrap();
        let imported = EventTable::import_from_bytes(&json, "json").unwrap();
        assert_eq!(table, imported);
    }

    #[test]
    fn test_unsupported_format() {
        let res = EventTable::import_from_bytes(CSV.as_bytes(), "pnml");
        assert!(matches!(res, Err(EventTableIOError::UnsupportedFormat(_))));
    }
}
