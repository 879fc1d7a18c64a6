//! Export adapter and the platform sink seam.
//!
//! The pipeline never touches files, clipboards or dialogs directly.
//! Everything outward-facing goes through a Sink.

use crate::{error::RfmResult, scoring::SegRecord};
use chrono::NaiveDate;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub const EXPORT_HEADER: [&str; 11] = [
    "id", "name", "email", "phone", "last_visit", "visits", "total_spend",
    "R", "F", "M", "segment",
];

/// Where exports and user-facing errors go.
pub trait Sink {
    fn export_rows(&mut self, records: &[&SegRecord]) -> RfmResult<()>;
    fn report_error(&mut self, message: &str);
}

/// `<prefix>-rfm-export-<YYYY-MM-DD>.csv`
pub fn export_filename(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}-rfm-export-{}.csv", today.format("%Y-%m-%d"))
}

pub fn write_csv<W: Write>(records: &[&SegRecord], writer: W) -> RfmResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for rec in records {
        let c = &rec.customer;
        wtr.write_record([
            c.id.clone(),
            c.name.clone(),
            c.email.clone().unwrap_or_default(),
            c.phone.clone().unwrap_or_default(),
            c.last_visit.format("%Y-%m-%d").to_string(),
            c.visits.to_string(),
            c.total_spend.to_string(),
            rec.scores.r.to_string(),
            rec.scores.f.to_string(),
            rec.scores.m.to_string(),
            rec.segment.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[&SegRecord]) -> RfmResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}

// ── Sinks ──────────────────────────────────────────────────────────

/// Writes `<prefix>-rfm-export-<today>.csv` into a directory.
/// Errors are logged.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir:     PathBuf,
    prefix:  String,
    today:   NaiveDate,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>, prefix: &str, today: NaiveDate) -> Self {
        Self {
            dir:     dir.as_ref().to_path_buf(),
            prefix:  prefix.to_string(),
            today,
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Sink for DirectorySink {
    fn export_rows(&mut self, records: &[&SegRecord]) -> RfmResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(export_filename(&self.prefix, self.today));
        let file = std::fs::File::create(&path)?;
        write_csv(records, std::io::BufWriter::new(file))?;
        log::info!("export: wrote {} rows to {}", records.len(), path.display());
        self.written.push(path);
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        log::error!("{message}");
    }
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub exports: Vec<Vec<u8>>,
    pub errors:  Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_export(&self) -> Option<&[u8]> {
        self.exports.last().map(Vec::as_slice)
    }
}

impl Sink for MemorySink {
    fn export_rows(&mut self, records: &[&SegRecord]) -> RfmResult<()> {
        self.exports.push(to_csv_bytes(records)?);
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
