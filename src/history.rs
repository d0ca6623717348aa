use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::results::Ledger;

pub const HISTORY_FILE: &str = "history.csv";

const HEADER: [&str; 7] = [
    "date",
    "session",
    "rank",
    "name",
    "time",
    "penalty",
    "effective_time",
];

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    date: String,
    session: String,
    rank: usize,
    name: &'a str,
    time: u64,
    penalty: String,
    effective_time: u64,
}

/// Append-only CSV log of finished leaderboards
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_path(dir.as_ref().join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, ledger: &Ledger) -> Result<usize> {
        self.append_at(ledger, Local::now())
    }

    /// Write one row per ranked result. Returns the number of rows written.
    pub fn append_at(&self, ledger: &Ledger, finished_at: DateTime<Local>) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        // If the file doesn't exist yet we need to emit a header
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
        }

        let date = finished_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let session = finished_at.format("%Y%m%d%H%M%S").to_string();
        let ranked = ledger.ranked();
        for (idx, entry) in ranked.iter().enumerate() {
            writer.serialize(HistoryRow {
                date: date.clone(),
                session: session.clone(),
                rank: idx + 1,
                name: &entry.name,
                time: entry.time,
                penalty: entry.penalty.to_string(),
                effective_time: entry.effective_time(),
            })?;
        }
        writer.flush().map_err(|e| Error::io(&self.path, e))?;

        Ok(ranked.len())
    }
}
