//! # Response Parsing
//!
//! Converts the NOAA annual-predictions text payload into typed records.
//! The payload has two sections: a `Key: Value` metadata preamble terminated
//! by a blank line, then a tab-delimited table (column header row followed by
//! one row per predicted high/low event).
//!
//! ## Tolerance rules
//!
//! The parser is deliberately asymmetric about bad input:
//! - A data row *missing* any required column (short or ragged row) is
//!   dropped silently. The service emits these around table edges and for
//!   stations with incomplete predictions.
//! - A field that is *present but malformed* (non-numeric height, bad
//!   date/time) is a fatal [`TideError`] — that shape never comes from the
//!   live service, so it signals a bug or a corrupted response.
//! - A response that ends before the data section ever starts yields an
//!   empty record list, not an error. That is how "no results" looks on the
//!   wire (e.g. an invalid station/datum combination).

use crate::error::TideError;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};

/// Date+time format used by the table's `Date` and `Time` columns, joined
/// with a single space.
const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Metadata keys that collide with reserved identifiers in common language
/// bindings, and what they are stored as instead.
const RESERVED_RENAMES: [(&str, &str); 1] = [("from", "period")];

/// Required table columns, by the exact names the service uses.
const COL_DATE: &str = "Date";
const COL_TIME: &str = "Time";
const COL_PRED_FT: &str = "Pred(Ft)";
const COL_PRED_CM: &str = "Pred(cm)";
const COL_HIGH_LOW: &str = "High/Low";

/// Normalized key/value pairs from the response preamble.
///
/// Keys are lower-cased with spaces replaced by underscores (`Time Zone`
/// becomes `time_zone`); the reserved key `from` is stored as `period`.
/// Populated once at parse time and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Look up a value by normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, raw_key: &str, value: &str) {
        let mut key = raw_key.replace(' ', "_").to_lowercase();
        for (reserved, rename) in RESERVED_RENAMES {
            if key == reserved {
                key = rename.to_string();
            }
        }
        self.0.insert(key, value.trim().to_string());
    }
}

/// One forecasted high/low tide event.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Event time in the requested time zone.
    pub datetime: NaiveDateTime,
    /// Predicted height in feet relative to the requested datum.
    pub pred_ft: f64,
    /// Predicted height in centimeters.
    pub pred_cm: f64,
    /// High/low indicator as sent by the service, typically `"H"` or `"L"`.
    pub high_low: String,
}

/// Parse a full response body into metadata and ordered prediction records.
///
/// Record order is table order, which the service emits chronologically.
pub fn parse_response(body: &str) -> Result<(Metadata, Vec<Prediction>), TideError> {
    let mut metadata = Metadata::default();
    let mut lines = body.lines();
    let mut reached_data = false;

    // HEADER state: key/value lines until the blank separator.
    for line in &mut lines {
        if let Some((key, value)) = line.split_once(": ") {
            metadata.insert(key, value);
        } else if line.trim().is_empty() {
            reached_data = true;
            break;
        }
        // Anything else (banner text, stray lines) is ignored.
    }

    if !reached_data {
        // Truncated before the data section; valid "no results" response.
        return Ok((metadata, Vec::new()));
    }

    // DATA state: first line is the column header.
    let Some(header_line) = lines.next() else {
        return Ok((metadata, Vec::new()));
    };
    let header: Vec<&str> = split_tab_runs(header_line)
        .into_iter()
        .map(str::trim)
        .collect();

    let mut records = Vec::new();
    for line in lines {
        let fields = split_tab_runs(line);
        let row: HashMap<&str, &str> = header.iter().copied().zip(fields).collect();
        if let Some(record) = parse_row(&row)? {
            records.push(record);
        }
    }

    Ok((metadata, records))
}

/// Extract one record from a positional field map.
///
/// Returns `Ok(None)` when a required column is absent (row dropped), and a
/// fatal error when a present value fails to parse. Fields are checked in
/// table order, so a malformed early field wins over a missing later one.
fn parse_row(row: &HashMap<&str, &str>) -> Result<Option<Prediction>, TideError> {
    let (Some(date), Some(time)) = (row.get(COL_DATE), row.get(COL_TIME)) else {
        return Ok(None);
    };
    let joined = format!("{} {}", date, time);
    let datetime = NaiveDateTime::parse_from_str(&joined, DATETIME_FORMAT).map_err(|source| {
        TideError::Timestamp {
            value: joined.clone(),
            source,
        }
    })?;

    let Some(ft) = row.get(COL_PRED_FT) else {
        return Ok(None);
    };
    let pred_ft = parse_height(COL_PRED_FT, ft)?;

    let Some(cm) = row.get(COL_PRED_CM) else {
        return Ok(None);
    };
    let pred_cm = parse_height(COL_PRED_CM, cm)?;

    let Some(high_low) = row.get(COL_HIGH_LOW) else {
        return Ok(None);
    };

    Ok(Some(Prediction {
        datetime,
        pred_ft,
        pred_cm,
        high_low: (*high_low).to_string(),
    }))
}

fn parse_height(column: &'static str, value: &str) -> Result<f64, TideError> {
    // Trimmed first: the service pads numeric cells with spaces.
    value
        .trim()
        .parse::<f64>()
        .map_err(|source| TideError::Height {
            column,
            value: value.to_string(),
            source,
        })
}

/// Split on runs of one-or-more tabs.
///
/// A run of consecutive tabs is a single delimiter; only leading or trailing
/// tab runs produce empty edge fields. This matches how the service pads its
/// table cells to fixed widths.
fn split_tab_runs(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let bytes = line.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\t' {
            fields.push(&line[start..i]);
            while i < bytes.len() && bytes[i] == b'\t' {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    fields.push(&line[start..]);
    fields
}
