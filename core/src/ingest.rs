//! CSV text -> raw rows.
//!
//! Any structural CSV error aborts the whole import; there is no
//! partial result. Ragged rows are tolerated: missing trailing cells
//! are simply absent from the row map.

use crate::{error::RfmResult, types::RawRow};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{fs::File, io::Read, path::Path};

pub fn read_rows<R: Read>(reader: R) -> RfmResult<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(to_row(&headers, &record?));
    }

    log::debug!("ingest: read {} rows, {} columns", rows.len(), headers.len());
    Ok(rows)
}

pub fn read_rows_from_path(path: impl AsRef<Path>) -> RfmResult<Vec<RawRow>> {
    let file = File::open(path)?;
    read_rows(std::io::BufReader::new(file))
}

pub fn read_rows_from_str(text: &str) -> RfmResult<Vec<RawRow>> {
    read_rows(text.as_bytes())
}

fn to_row(headers: &StringRecord, record: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect()
}
