// 📝 Progress Logger
// Append-only milestone log: one "<timestamp> : <message>" line per stage.
// Write failures are reported through tracing and otherwise ignored.

use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Year-MonthAbbrev-Day-Hour:Minute:Second, e.g. 2024-Mar-05-14:07:09
pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

/// Pipeline milestones, in the order a successful run reaches them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Preliminaries,
    Extracted,
    Transformed,
    CsvSaved,
    DbConnected,
    DbLoaded,
    Complete,
}

impl Milestone {
    pub fn message(&self) -> &'static str {
        match self {
            Milestone::Preliminaries => "Preliminaries complete. Initiating ETL process",
            Milestone::Extracted => "Data extraction complete. Initiating Transformation process",
            Milestone::Transformed => "Data transformation complete. Initiating loading process",
            Milestone::CsvSaved => "Data saved to CSV file",
            Milestone::DbConnected => "SQL Connection initiated.",
            Milestone::DbLoaded => "Data loaded to Database as table. Running the query",
            Milestone::Complete => "Process Complete.",
        }
    }
}

pub fn format_entry(timestamp: NaiveDateTime, message: &str) -> String {
    format!("{} : {}\n", timestamp.format(TIMESTAMP_FORMAT), message)
}

#[derive(Debug, Clone)]
pub struct ProgressLogger {
    path: PathBuf,
}

impl ProgressLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProgressLogger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn milestone(&self, milestone: Milestone) {
        self.log(milestone.message());
    }

    /// Append one timestamped line. Never fails the caller.
    pub fn log(&self, message: &str) {
        let entry = format_entry(Local::now().naive_local(), message);
        if let Err(e) = self.append(&entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "progress log write failed");
        }
    }

    fn append(&self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}
