use crate::errors::ParseError;
use crate::models::{MoodRecord, RawRecord};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Turns raw store rows into typed records. Rows with unreadable timestamps
/// are kept with `timestamp: None`.
pub fn normalize(rows: Vec<RawRecord>) -> Vec<MoodRecord> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let (record, err) = normalize_row(index, &row);
            if let Some(err) = err {
                warn!("{err}");
            }
            record
        })
        .collect()
}

pub fn normalize_row(index: usize, row: &RawRecord) -> (MoodRecord, Option<ParseError>) {
    let raw_timestamp = row.get("timestamp").map(cell_text).unwrap_or_default();
    let timestamp = parse_timestamp(&raw_timestamp);
    let err = match timestamp {
        Some(_) => None,
        None => Some(ParseError {
            // header occupies the first row of the sheet
            row: index + 2,
            value: raw_timestamp,
        }),
    };

    let record = MoodRecord {
        timestamp,
        mood: row.get("mood").map(cell_text).unwrap_or_default(),
        note: row.get("note").map(cell_text).unwrap_or_default(),
    };
    (record, err)
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
