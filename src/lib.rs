//! # Tidetable Core Library
//!
//! Downloads a NOAA annual tide-prediction table and exposes it as typed,
//! ordered records with CSV export.
//!
//! ## Data Source
//!
//! ### NOAA Tides and Currents facade
//! - **URL**: https://tidesandcurrents.noaa.gov/noaatidepredictions/NOAATidesFacade.jsp
//! - **Format**: `Key: Value` metadata preamble, a blank line, then a
//!   tab-delimited table (`Date`, `Time`, `Pred(Ft)`, `Pred(cm)`, `High/Low`)
//! - **Scope**: one request-response cycle per table; no caching, no retries
//!
//! ## Pipeline
//!
//! 1. **Build**: [`TideRequest`] resolves station/year/datum/time zone into
//!    the exact query the facade expects
//! 2. **Fetch**: a [`Transport`] performs one blocking HTTP request
//! 3. **Parse**: the two-section body becomes [`Metadata`] plus ordered
//!    [`Prediction`] records, tolerating ragged rows and empty responses
//! 4. **Expose**: [`TideTable`] freezes the result and serializes CSV
//!
//! ## Example
//!
//! ```no_run
//! use tidetable::{Datum, TideRequest, TideTable};
//!
//! # fn main() -> Result<(), tidetable::TideError> {
//! let request = TideRequest::new("8517921")?.datum(Datum::parse("mllw"));
//! let table = TideTable::fetch(request)?;
//! table.write_csv(std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod parse;
pub mod request;
pub mod table;
pub mod transport;

pub use config::Config;
pub use error::TideError;
pub use parse::{Metadata, Prediction};
pub use request::{Datum, TideRequest, TimeZone, BASE_URL, DATUMS};
pub use table::TideTable;
pub use transport::{FetchedResponse, HttpTransport, Transport};
