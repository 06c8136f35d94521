//! # Error Types
//!
//! All fatal failure modes in the fetch-and-parse pipeline, from request
//! validation through transport to CSV serialization. Tolerated conditions
//! (unknown datum, short data rows, truncated responses, broken output pipes)
//! never surface here; they degrade silently by design.

use thiserror::Error;

/// Errors that abort construction or export of a tide table.
///
/// A fatal error means no partial table is returned. Recoverable conditions
/// are handled inside the parser and never reach this enum.
#[derive(Error, Debug)]
pub enum TideError {
    /// Station id was empty or otherwise unusable for building a request.
    #[error("invalid station id: {0:?}")]
    InvalidStation(String),

    /// HTTP request failed (network, TLS, or non-success status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A data row carried a `Date`/`Time` pair that does not match
    /// `YYYY/MM/DD HH:MM`. Distinct from a *missing* field, which drops
    /// the row instead.
    #[error("malformed timestamp {value:?} in prediction row")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A predicted-height field was present but not numeric.
    #[error("malformed height {value:?} in column {column:?}")]
    Height {
        column: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// CSV serialization failed for a reason other than a broken pipe.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Opening the CSV destination file failed.
    #[error("cannot open output file: {0}")]
    Output(#[from] std::io::Error),
}
