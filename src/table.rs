//! # Tide Table Facade
//!
//! Owns one complete fetch-and-parse cycle: build the request, hand it to a
//! transport, parse the body, and freeze the result. A [`TideTable`] is
//! never mutated after construction; a fatal error during any stage means no
//! table at all, never a partial one.
//!
//! The raw response text and resolved URL are kept on the table so an
//! unexpectedly empty result can be diagnosed without re-fetching.

use crate::error::TideError;
use crate::parse::{parse_response, Metadata, Prediction};
use crate::request::{Datum, TideRequest, TimeZone};
use crate::transport::{FetchedResponse, HttpTransport, Transport};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// CSV column order, fixed regardless of what the service sent.
const CSV_HEADER: [&str; 4] = ["datetime", "pred_ft", "pred_cm", "high_low"];

/// Timestamp rendering for CSV output.
const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An annual tide prediction table for one station.
///
/// Records are in table order, which the service emits chronologically.
/// The effective request parameters (after datum fallback and year/time-zone
/// defaulting) are exposed alongside the parsed data.
#[derive(Clone, Debug)]
pub struct TideTable {
    request: TideRequest,
    metadata: Metadata,
    records: Vec<Prediction>,
    url: String,
    raw: String,
}

impl TideTable {
    /// Fetch and parse predictions using the production HTTP transport.
    pub fn fetch(request: TideRequest) -> Result<TideTable, TideError> {
        let transport = HttpTransport::new()?;
        Self::fetch_with(request, &transport)
    }

    /// Fetch and parse predictions through a caller-supplied transport.
    pub fn fetch_with(
        request: TideRequest,
        transport: &impl Transport,
    ) -> Result<TideTable, TideError> {
        let response = transport.fetch(&request)?;
        Self::from_response(request, response)
    }

    /// Build a table from an already-fetched response.
    pub fn from_response(
        request: TideRequest,
        response: FetchedResponse,
    ) -> Result<TideTable, TideError> {
        let (metadata, records) = parse_response(&response.body)?;
        if records.is_empty() {
            tracing::warn!(
                station = request.station_id(),
                url = %response.url,
                "response contained no prediction rows"
            );
        }
        Ok(TideTable {
            request,
            metadata,
            records,
            url: response.url,
            raw: response.body,
        })
    }

    /// Prediction records in chronological table order.
    pub fn records(&self) -> &[Prediction] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Normalized key/value pairs from the response preamble.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The resolved URL the response actually came from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The unparsed response body, for diagnosing unexpected results.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn station_id(&self) -> &str {
        self.request.station_id()
    }

    /// The year that was actually requested (after defaulting).
    pub fn year(&self) -> i32 {
        self.request.effective_year()
    }

    /// The datum that was actually sent (after any silent fallback).
    pub fn datum(&self) -> Datum {
        self.request.effective_datum()
    }

    /// The time zone selector that was actually sent.
    pub fn time_zone(&self) -> TimeZone {
        self.request.effective_time_zone()
    }

    /// Serialize all records as CSV into a caller-owned sink.
    ///
    /// The sink is flushed but never closed; ownership stays with the
    /// caller. If the sink reports a broken pipe mid-write (the consumer
    /// hung up, e.g. `tidetable ... | head`), the remaining writes are
    /// abandoned silently and `Ok` is returned.
    pub fn write_csv<W: Write>(&self, sink: W) -> Result<(), TideError> {
        match self.write_rows(sink) {
            Err(ref err) if is_broken_pipe(err) => Ok(()),
            other => other,
        }
    }

    /// Serialize all records as CSV to a file path.
    ///
    /// The file is created (truncating any existing content) and closed on
    /// every exit path, including the broken-sink case.
    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TideError> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    fn write_rows<W: Write>(&self, sink: W) -> Result<(), TideError> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            writer.write_record(&[
                record.datetime.format(CSV_DATETIME_FORMAT).to_string(),
                record.pred_ft.to_string(),
                record.pred_cm.to_string(),
                record.high_low.clone(),
            ])?;
        }
        writer.flush().map_err(TideError::Output)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TideTable {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn is_broken_pipe(err: &TideError) -> bool {
    match err {
        TideError::Csv(err) => {
            matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == io::ErrorKind::BrokenPipe)
        }
        TideError::Output(io) => io.kind() == io::ErrorKind::BrokenPipe,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    const GMT_BODY: &str = "Stationid: 8517921\n\
        Time Zone: GMT\n\
        Datum: MLLW\n\
        \n\
        Date \tDay\tTime\tPred(Ft)\tPred(cm)\tHigh/Low\n\
        2015/01/01\tThu\t05:01\t4.4\t134\tH\n\
        2015/01/01\tThu\t11:45\t0.2\t6\tL\n";

    const LST_BODY: &str = "Stationid: 8517921\n\
        Time Zone: LST\n\
        Datum: MLLW\n\
        \n\
        Date \tDay\tTime\tPred(Ft)\tPred(cm)\tHigh/Low\n\
        2015/01/01\tThu\t00:01\t4.4\t134\tH\n\
        2015/01/01\tThu\t06:45\t0.2\t6\tL\n";

    struct StubTransport {
        body: &'static str,
    }

    impl Transport for StubTransport {
        fn fetch(&self, request: &TideRequest) -> Result<FetchedResponse, TideError> {
            Ok(FetchedResponse {
                url: format!("stub://predictions?Stationid={}", request.station_id()),
                body: self.body.to_string(),
            })
        }
    }

    fn gmt_table() -> TideTable {
        let request = TideRequest::new("8517921").unwrap().year(2015);
        TideTable::fetch_with(request, &StubTransport { body: GMT_BODY }).unwrap()
    }

    #[test]
    fn table_carries_records_metadata_and_diagnostics() {
        let table = gmt_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.station_id(), "8517921");
        assert_eq!(table.year(), 2015);
        assert_eq!(table.metadata().get("time_zone"), Some("GMT"));
        assert!(table.url().contains("8517921"));
        assert_eq!(table.raw(), GMT_BODY);
    }

    #[test]
    fn iteration_follows_table_order() {
        let table = gmt_table();
        let highs_lows: Vec<&str> = table.iter().map(|r| r.high_low.as_str()).collect();
        assert_eq!(highs_lows, ["H", "L"]);
        assert!(table.records()[0].datetime < table.records()[1].datetime);
    }

    #[test]
    fn unrecognized_datum_reports_fallback_default() {
        let request = TideRequest::new("8517921")
            .unwrap()
            .datum(Datum::parse("NOT-A-DATUM"));
        let table = TideTable::fetch_with(request, &StubTransport { body: GMT_BODY }).unwrap();
        assert_eq!(table.datum(), Datum::Mllw);
    }

    #[test]
    fn time_zone_selector_changes_reported_times() {
        let gmt = gmt_table();
        let request = TideRequest::new("8517921")
            .unwrap()
            .year(2015)
            .time_zone(TimeZone::LocalStandard);
        let lst = TideTable::fetch_with(request, &StubTransport { body: LST_BODY }).unwrap();

        assert_eq!(gmt.time_zone(), TimeZone::Gmt);
        assert_eq!(lst.time_zone(), TimeZone::LocalStandard);
        assert_eq!(gmt.metadata().get("time_zone"), Some("GMT"));
        assert_eq!(lst.metadata().get("time_zone"), Some("LST"));
        assert_ne!(
            gmt.records()[0].datetime,
            lst.records()[0].datetime
        );
    }

    #[test]
    fn empty_response_yields_valid_empty_table() {
        let request = TideRequest::new("8517921").unwrap();
        let table = TideTable::fetch_with(
            request,
            &StubTransport {
                body: "Stationid: 8517921\n",
            },
        )
        .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
        // Raw text kept so the caller can see what came back.
        assert_eq!(table.raw(), "Stationid: 8517921\n");
    }

    #[test]
    fn csv_round_trips_through_reader() {
        let table = gmt_table();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(CSV_HEADER.as_slice())
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), table.len());
        for (row, record) in rows.iter().zip(table.iter()) {
            assert_eq!(&row[0], record.datetime.format("%Y-%m-%d %H:%M:%S").to_string());
            assert_eq!(&row[1], record.pred_ft.to_string());
            assert_eq!(&row[2], record.pred_cm.to_string());
            assert_eq!(&row[3], record.high_low);
        }
    }

    #[test]
    fn csv_to_path_creates_readable_file() {
        let table = gmt_table();
        let file = NamedTempFile::new().unwrap();
        table.write_csv_path(file.path()).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("datetime,pred_ft,pred_cm,high_low"));
        assert_eq!(lines.next(), Some("2015-01-01 05:01:00,4.4,134,H"));
        assert_eq!(lines.next(), Some("2015-01-01 11:45:00,0.2,6,L"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_table_writes_header_only() {
        let request = TideRequest::new("8517921").unwrap();
        let table =
            TideTable::fetch_with(request, &StubTransport { body: "" }).unwrap();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "datetime,pred_ft,pred_cm,high_low\n"
        );
    }

    /// Sink that reports a hung-up consumer on every write.
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "consumer gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "consumer gone"))
        }
    }

    #[test]
    fn broken_pipe_during_csv_write_is_silent() {
        let table = gmt_table();
        assert!(table.write_csv(BrokenSink).is_ok());
    }

    /// Sink whose failure is not a broken pipe; this one must propagate.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn non_pipe_write_errors_propagate() {
        let table = gmt_table();
        assert!(table.write_csv(FullDisk).is_err());
    }
}
