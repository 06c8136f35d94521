//! # Request Builder
//!
//! Translates high-level parameters (station, year, datum, time zone) into
//! the exact query string and headers the NOAA NOAATidesFacade endpoint
//! expects. Pure transformation: no network I/O happens here — the built
//! request is handed to a [`Transport`](crate::transport::Transport).
//!
//! The endpoint's contract is year-based: `bdate=<year>0101` with
//! `datatype=Annual TXT` returns the full annual prediction table.

use crate::error::TideError;
use chrono::{Datelike, Local};

/// Base URL of the NOAA tide predictions facade.
pub const BASE_URL: &str =
    "https://tidesandcurrents.noaa.gov/noaatidepredictions/NOAATidesFacade.jsp";

/// The closed set of vertical datums the service accepts, in wire form.
///
/// The first entry is the default; unrecognized datum strings silently fall
/// back to it rather than erroring, because the live service does the same.
pub const DATUMS: [&str; 9] = [
    "MLLW", "MSL", "MHW", "STND", "MTL", "MLW", "MHHW", "DTL", "NAVD",
];

/// Vertical reference level for tide height predictions.
///
/// Parsing is case-insensitive and never fails: anything outside the closed
/// set degrades to [`Datum::default`] (MLLW). This fallback affects which
/// records the live service returns, so it must stay silent rather than
/// becoming an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Datum {
    /// Mean Lower Low Water (service default)
    #[default]
    Mllw,
    /// Mean Sea Level
    Msl,
    /// Mean High Water
    Mhw,
    /// Station datum
    Stnd,
    /// Mean Tide Level
    Mtl,
    /// Mean Low Water
    Mlw,
    /// Mean Higher High Water
    Mhhw,
    /// Diurnal Tide Level
    Dtl,
    /// North American Vertical Datum
    Navd,
}

impl Datum {
    /// Parse a datum name, falling back to the default on anything
    /// unrecognized. Input is normalized to uppercase first.
    pub fn parse(s: &str) -> Datum {
        match s.trim().to_uppercase().as_str() {
            "MLLW" => Datum::Mllw,
            "MSL" => Datum::Msl,
            "MHW" => Datum::Mhw,
            "STND" => Datum::Stnd,
            "MTL" => Datum::Mtl,
            "MLW" => Datum::Mlw,
            "MHHW" => Datum::Mhhw,
            "DTL" => Datum::Dtl,
            "NAVD" => Datum::Navd,
            other => {
                tracing::debug!(datum = other, "unrecognized datum, using default");
                Datum::default()
            }
        }
    }

    /// Uppercase wire form, as sent in the `datum` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Datum::Mllw => "MLLW",
            Datum::Msl => "MSL",
            Datum::Mhw => "MHW",
            Datum::Stnd => "STND",
            Datum::Mtl => "MTL",
            Datum::Mlw => "MLW",
            Datum::Mhhw => "MHHW",
            Datum::Dtl => "DTL",
            Datum::Navd => "NAVD",
        }
    }
}

/// Time zone selector for reported prediction times.
///
/// The service encodes this as a small integer. Local standard time ignores
/// daylight saving all year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeZone {
    /// Greenwich Mean Time (wire value 0)
    #[default]
    Gmt,
    /// Local standard time, no DST (wire value 1)
    LocalStandard,
}

impl TimeZone {
    /// Integer wire form for the `timeZone` query parameter.
    pub fn wire_value(&self) -> u8 {
        match self {
            TimeZone::Gmt => 0,
            TimeZone::LocalStandard => 1,
        }
    }
}

/// A fully resolved request for one station-year of predictions.
///
/// Construction validates the station id and resolves every optional
/// parameter, so the values carried here are exactly what goes on the wire
/// (and exactly what [`TideTable`](crate::TideTable) later reports as the
/// effective parameters).
#[derive(Clone, Debug)]
pub struct TideRequest {
    station_id: String,
    year: i32,
    datum: Datum,
    time_zone: TimeZone,
}

impl TideRequest {
    /// Build a request for the given station with all defaults: current
    /// calendar year, MLLW datum, GMT times.
    ///
    /// The only fatal input is an empty station id.
    pub fn new(station_id: impl Into<String>) -> Result<TideRequest, TideError> {
        let station_id = station_id.into();
        if station_id.trim().is_empty() {
            return Err(TideError::InvalidStation(station_id));
        }
        Ok(TideRequest {
            station_id,
            year: Local::now().year(),
            datum: Datum::default(),
            time_zone: TimeZone::default(),
        })
    }

    /// Override the prediction year.
    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Override the datum. Use [`Datum::parse`] for free-form input.
    pub fn datum(mut self, datum: Datum) -> Self {
        self.datum = datum;
        self
    }

    /// Override the time zone selector.
    pub fn time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn effective_year(&self) -> i32 {
        self.year
    }

    pub fn effective_datum(&self) -> Datum {
        self.datum
    }

    pub fn effective_time_zone(&self) -> TimeZone {
        self.time_zone
    }

    /// Query parameters in wire form.
    ///
    /// `bdate` is January 1 of the target year; together with
    /// `datatype=Annual TXT` the service returns the whole year.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("datatype", "Annual TXT".to_string()),
            ("timeUnits", "1".to_string()),
            ("Stationid", self.station_id.clone()),
            ("timeZone", self.time_zone.wire_value().to_string()),
            ("datum", self.datum.as_str().to_string()),
            ("bdate", format!("{:04}0101", self.year)),
        ]
    }

    /// Referer header value the facade expects alongside the query.
    pub fn referer(&self) -> String {
        format!("{}?Stationid={}", BASE_URL, self.station_id)
    }
}
