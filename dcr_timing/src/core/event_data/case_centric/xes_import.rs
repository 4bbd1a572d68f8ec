//! XES Import for [`EventTable`]s
//!
//! Flattens each trace of a XES log into `(case id, activity, timestamp)` records.
//! Only the configured identifying attributes are read; all other attributes, global defaults,
//! extensions and classifiers are skipped.

use std::io::BufRead;

use chrono::{DateTime, FixedOffset};
use quick_xml::{
    events::{BytesStart, Event as XmlEvent},
    Reader,
};

use super::{
    io::{EventTableIOError, EventTableImportOptions},
    EventTable,
};
use crate::core::event_data::timestamp_utils::parse_timestamp;

#[derive(Debug, Default)]
struct EventData {
    activity: Option<String>,
    timestamp: Option<String>,
}

#[derive(Debug, Default)]
struct TraceData {
    id: Option<String>,
    events: Vec<EventData>,
}

/// Parsing position inside the XES document
#[derive(Debug, Default)]
struct XesState {
    in_global: bool,
    /// Depth of child elements below an attribute (e.g., container contents)
    nested: usize,
    trace: Option<TraceData>,
    event: Option<EventData>,
}

fn attribute_value(t: &BytesStart<'_>, key: &str) -> Result<Option<String>, EventTableIOError> {
    match t.try_get_attribute(key).map_err(quick_xml::Error::from)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

impl XesState {
    /// Record an attribute tag (e.g., `<string key=".." value=".."/>`) if it is one of the identifying keys
    fn add_attribute(
        &mut self,
        t: &BytesStart<'_>,
        options: &EventTableImportOptions,
    ) -> Result<(), EventTableIOError> {
        if self.in_global {
            return Ok(());
        }
        let Some(key) = attribute_value(t, "key")? else {
            return Ok(());
        };
        if let Some(event) = &mut self.event {
            if key == options.activity_column {
                event.activity = attribute_value(t, "value")?;
            } else if key == options.timestamp_column {
                event.timestamp = attribute_value(t, "value")?;
            }
        } else if let Some(trace) = &mut self.trace {
            if key == options.trace_id_key() {
                trace.id = attribute_value(t, "value")?;
            }
        }
        Ok(())
    }
}

/// Parse a timestamp attribute value, reporting `event_number` on failure
fn event_timestamp(
    raw: &str,
    event_number: usize,
    date_format: Option<&str>,
) -> Result<DateTime<FixedOffset>, EventTableIOError> {
    parse_timestamp(raw, date_format).ok_or_else(|| EventTableIOError::InvalidTimestamp {
        row: event_number,
        value: raw.to_string(),
    })
}

/// Import an [`EventTable`] from a XES reader with default options
pub fn import_xes_event_table<R: BufRead>(reader: R) -> Result<EventTable, EventTableIOError> {
    import_xes_event_table_with_options(reader, &EventTableImportOptions::default())
}

///
/// Import an [`EventTable`] from a XES reader
///
/// The case identifier is read from the trace attribute [`EventTableImportOptions::trace_id_key`];
/// traces without it are identified by their position (1-based).
/// Every event needs an activity and a valid timestamp, otherwise the import fails.
///
pub fn import_xes_event_table_with_options<R: BufRead>(
    reader: R,
    options: &EventTableImportOptions,
) -> Result<EventTable, EventTableIOError> {
    let date_fmt = options.date_format.as_deref();
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut state = XesState::default();
    let mut records: Vec<(String, String, DateTime<FixedOffset>)> = Vec::new();
    let mut num_traces: usize = 0;
    let mut num_events: usize = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(t) => {
                if state.nested > 0 {
                    state.nested += 1;
                } else {
                    match t.name().as_ref() {
                        b"log" => {}
                        b"global" => state.in_global = true,
                        b"trace" if !state.in_global => state.trace = Some(TraceData::default()),
                        b"event" if state.trace.is_some() => {
                            state.event = Some(EventData::default())
                        }
                        _ => {
                            state.add_attribute(&t, options)?;
                            state.nested = 1;
                        }
                    }
                }
            }
            XmlEvent::Empty(t) => {
                if state.nested == 0 {
                    match t.name().as_ref() {
                        b"trace" => num_traces += 1,
                        b"event" if !state.in_global => {
                            if let Some(trace) = &mut state.trace {
                                trace.events.push(EventData::default());
                            }
                        }
                        _ => state.add_attribute(&t, options)?,
                    }
                }
            }
            XmlEvent::End(t) => {
                if state.nested > 0 {
                    state.nested -= 1;
                } else {
                    match t.name().as_ref() {
                        b"global" => state.in_global = false,
                        b"event" => {
                            if let (Some(trace), Some(event)) = (&mut state.trace, state.event.take())
                            {
                                trace.events.push(event);
                            }
                        }
                        b"trace" if state.trace.is_some() => {
                            let trace = state.trace.take().unwrap_or_default();
                            num_traces += 1;
                            let case_id = trace.id.unwrap_or_else(|| {
                                tracing::debug!(trace = num_traces, "trace without identifier");
                                num_traces.to_string()
                            });
                            for event in trace.events {
                                num_events += 1;
                                let missing = |key: &str| EventTableIOError::MissingAttribute {
                                    event: num_events,
                                    key: key.to_string(),
                                };
                                let activity = event
                                    .activity
                                    .ok_or_else(|| missing(&options.activity_column))?;
                                let raw_time = event
                                    .timestamp
                                    .ok_or_else(|| missing(&options.timestamp_column))?;
                                let timestamp = event_timestamp(&raw_time, num_events, date_fmt)?;
                                records.push((case_id.clone(), activity, timestamp));
                            }
                        }
                        _ => {}
                    }
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let table = EventTable::from_events(records);
    tracing::debug!(
        traces = num_traces,
        cases = table.cases.len(),
        events = table.num_events(),
        "imported XES event table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_XES: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<log xes.version="1.0" xmlns="http://www.xes-standard.org/">
  <extension name="Concept" prefix="concept" uri="http://www.xes-standard.org/concept.xesext"/>
  <global scope="event">
    <string key="concept:name" value="__INVALID__"/>
    <date key="time:timestamp" value="1970-01-01T00:00:00.000+01:00"/>
  </global>
  <classifier name="Activity" keys="concept:name"/>
  <string key="concept:name" value="Road Traffic Fines"/>
  <trace>
    <string key="concept:name" value="A1"/>
    <event>
      <string key="concept:name" value="Create Fine"/>
      <date key="time:timestamp" value="2006-07-24T00:00:00.000+02:00"/>
      <float key="amount" value="35.0"/>
    </event>
    <event>
      <date key="time:timestamp" value="2006-12-05T00:00:00.000+01:00"/>
      <string key="concept:name" value="Send &amp; Notify"/>
      <container key="details">
        <string key="concept:name" value="nested, ignored"/>
      </container>
    </event>
  </trace>
  <trace>
    <string key="concept:name" value="A100"/>
    <event>
      <string key="concept:name" value="Create Fine"/>
      <date key="time:timestamp" value="2006-08-02T00:00:00.000+02:00"/>
    </event>
  </trace>
  <trace/>
</log>
"#;

    #[test]
    fn test_import_xes_event_table() {
        let table = import_xes_event_table(TEST_XES.as_bytes()).unwrap();
        let ids: Vec<&str> = table.cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A100"]);
        assert_eq!(table.num_events(), 3);

        let a1 = table.get_case("A1").unwrap();
        let acts: Vec<&str> = a1.events.iter().map(|e| e.activity.as_str()).collect();
        assert_eq!(acts, vec!["Create Fine", "Send & Notify"]);
        assert_eq!(a1.events[0].timestamp.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_trace_without_identifier() {
        let xes = r#"<log><trace><event><string key="concept:name" value="a"/><date key="time:timestamp" value="2020-01-01T00:00:00Z"/></event></trace></log>"#;
        let table = import_xes_event_table(xes.as_bytes()).unwrap();
        assert_eq!(table.cases[0].id, "1");
    }

    #[test]
    fn test_missing_timestamp_fails() {
        let xes = r#"<log><trace><string key="concept:name" value="c"/><event><string key="concept:name" value="a"/></event></trace></log>"#;
        match import_xes_event_table(xes.as_bytes()) {
            Err(EventTableIOError::MissingAttribute { event, key }) => {
                assert_eq!(event, 1);
                assert_eq!(key, "time:timestamp");
            }
            other => panic!("Expected missing attribute error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_timestamp_fails() {
        let xes = r#"<log><trace><event><string key="concept:name" value="a"/><date key="time:timestamp" value="soon"/></event></trace></log>"#;
        assert!(matches!(
            import_xes_event_table(xes.as_bytes()),
            Err(EventTableIOError::InvalidTimestamp { row: 1, .. })
        ));
    }

    #[test]
    fn test_custom_keys() {
        let xes = r#"<log><trace><string key="id" value="x"/><event><string key="act" value="a"/><date key="ts" value="2020-01-01T00:00:00Z"/></event></trace></log>"#;
        let options = EventTableImportOptions {
            case_column: "case:id".into(),
            activity_column: "act".into(),
            timestamp_column: "ts".into(),
            ..Default::default()
        };
        let table = import_xes_event_table_with_options(xes.as_bytes(), &options).unwrap();
        assert_eq!(table.cases[0].id, "x");
        assert_eq!(table.cases[0].events[0].activity, "a");
    }
}
