//! Date/time parsing and day.js-style formatting for `toDateTime`
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Format tokens, longest first so that `MMMM` wins over `MM`
const FORMAT_TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Interpret a source value as an instant.
///
/// Numbers are epoch milliseconds. Strings may be RFC 3339 or a naive
/// date/time, which is read in `local`.
pub fn parse_instant(value: &Value, local: Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_str(s.trim(), local),
        _ => None,
    }
}

fn parse_str(s: &str, local: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(|ms| Utc.timestamp_millis_opt(ms).single());
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Translate a day.js-style format (`YYYY-MM-DD HH:mm:ss`) into a chrono
/// format string. Text inside `[...]` is copied literally.
pub fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        for (token, spec) in FORMAT_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        push_literal(&mut out, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}

/// Render `instant` in `tz` using a day.js-style format.
pub fn format_instant(instant: &DateTime<Utc>, tz: Tz, format: &str) -> String {
    instant
        .with_timezone(&tz)
        .format(&to_chrono_format(format))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_translation() {
        assert_eq!(to_chrono_format("YYYY-MM-DD HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(to_chrono_format("MM/DD/YYYY HH:mm"), "%m/%d/%Y %H:%M");
        assert_eq!(to_chrono_format("YYYY-MM-DDTHH:mm:ssZ"), "%Y-%m-%dT%H:%M:%S%:z");
        assert_eq!(to_chrono_format("[Day] D, MMMM"), "Day %-d, %B");
        assert_eq!(to_chrono_format("100%"), "100%%");
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let instant = parse_instant(&json!("2024-01-20T14:00:00-05:00"), Tz::UTC).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-20T19:00:00+00:00");
    }

    #[test]
    fn test_parse_naive_in_local_zone() {
        let instant = parse_instant(&json!("2024-01-15 10:30:00"), Tz::Asia__Kolkata).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-15T05:00:00+00:00");
    }

    #[test]
    fn test_parse_date_only_and_millis() {
        let date = parse_instant(&json!("2024-02-01"), Tz::UTC).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-02-01T00:00:00+00:00");

        let millis = parse_instant(&json!(0), Tz::UTC).unwrap();
        assert_eq!(millis.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_unparsable() {
        assert!(parse_instant(&json!("not a date"), Tz::UTC).is_none());
        assert!(parse_instant(&json!(true), Tz::UTC).is_none());
    }

    #[test]
    fn test_format_in_zone() {
        let instant = parse_instant(&json!("2024-01-15T10:30:00Z"), Tz::UTC).unwrap();
        assert_eq!(
            format_instant(&instant, Tz::America__New_York, "YYYY-MM-DD HH:mm:ss"),
            "2024-01-15 05:30:00"
        );
        assert_eq!(format_instant(&instant, Tz::UTC, "hh:mm A"), "10:30 AM");
    }
}
