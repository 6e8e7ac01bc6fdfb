use chrono::{DateTime, Utc};

pub const UNKNOWN_DATE: &str = "Date is unknown";

const DISPLAY_FORMAT: &str = "%B %-d, %Y";
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Parses `yyyy-MM-ddTHH:mm:ss` followed by `Z` or a `±hh:mm` offset.
/// Fractional seconds and a space separator are rejected.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let zulu;
    let raw = match raw.strip_suffix('Z') {
        Some(rest) => {
            zulu = format!("{}+00:00", rest);
            zulu.as_str()
        }
        None => raw,
    };
    DateTime::parse_from_str(raw, WIRE_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Renders a publication timestamp as "Month D, YYYY" in UTC, or the
/// placeholder when the timestamp is missing or not parseable.
pub fn format_published_at(raw: Option<&str>) -> String {
    raw.and_then(parse_published_at)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}
