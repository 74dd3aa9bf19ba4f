//! JSONL file writer for analysis records.
//!
//! Each [`AnalysisRecord`] is serialized as a single JSON line and appended
//! to the file via a buffered writer, so repeated runs accumulate in one
//! store.

use insight_domain::AnalysisRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RecordWriterError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record writer lock poisoned")]
    Poisoned,
}

/// JSONL record writer that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlRecordWriter {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRecordWriter {
    /// Open `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordWriterError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| RecordWriterError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_error)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append every record and flush. Returns the number written.
    pub fn write_all(&self, records: &[AnalysisRecord]) -> Result<usize, RecordWriterError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| RecordWriterError::Poisoned)?;

        for record in records {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line).map_err(|source| self.io_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))?;

        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(records.len())
    }

    fn io_error(&self, source: std::io::Error) -> RecordWriterError {
        RecordWriterError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Drop for JsonlRecordWriter {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Read every record from a JSONL file, skipping blank lines.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<AnalysisRecord>, RecordWriterError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| RecordWriterError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_error)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
