use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Timezone-aware formats, tried in order after RFC3339 and RFC2822
const ZONED_FORMATS: &[&str] = &[
    // 2023-10-06 09:30:21+00:00 (as written by pandas)
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    // 2023-10-06T09:30:21+0000
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    // 2023-10-06 09:30:21+0000
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Naive formats, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%F %T", "%F %T%.f", "%FT%T", "%FT%T%.f", "%F %T UTC", "%F %H:%M",
];

/// Parse a timestamp string to `DateTime<FixedOffset>`, trying multiple formats.
///
/// # Supported Formats (in order of precedence)
/// 1. Custom format (if provided), first timezone-aware, then naive (assumes UTC)
/// 2. RFC3339: `2023-10-06T09:30:21+00:00`
/// 3. RFC2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 4. Offsets without `T` separator or without colon: `2023-10-06 09:30:21+00:00`, `2023-10-06T09:30:21+0000`
/// 5. Naive datetimes (assumes UTC): `2023-10-06 09:30:21.890421`, `2023-10-06T09:30:21`, `2023-10-06 09:30:21 UTC`
/// 6. Plain dates (midnight UTC): `2023-10-06`
///
/// Returns `None` if no format matches. Callers decide whether this is fatal.
pub fn parse_timestamp(time: &str, custom_format: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let time = time.trim();
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Some(dt.and_utc().into());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Some(dt);
    }
    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(time, f).ok())
    {
        return Some(dt);
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(time, f).ok())
    {
        return Some(dt.and_utc().into());
    }
    if let Ok(date) = NaiveDate::parse_from_str(time, "%F") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().fixed_offset());
    }

    tracing::trace!(value = time, "failed to parse timestamp");
    None
}
