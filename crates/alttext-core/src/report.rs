//! Report output in CSV or JSON Lines.
//!
//! Rows are collected in processing order and written in one go at the end
//! of a run. The target file is truncated first, so a rerun replaces the
//! previous report instead of appending to it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::ReportFormat;
use crate::error::ReportError;
use crate::types::ReportRow;

/// CSV header, always written even when there are no rows.
pub const CSV_HEADER: [&str; 3] = ["Image", "Size", "Alt Text"];

/// A writer that serializes report rows to CSV or JSONL.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    rows_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Create a new report writer.
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self {
            writer,
            format,
            rows_written: 0,
        }
    }

    /// Write all rows, preceded by the header for CSV.
    pub fn write_all(&mut self, rows: &[ReportRow]) -> Result<(), ReportError> {
        match self.format {
            ReportFormat::Csv => {
                let mut csv = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(&mut self.writer);
                csv.write_record(CSV_HEADER)?;
                for row in rows {
                    csv.serialize(row)?;
                }
                csv.flush()?;
            }
            ReportFormat::Jsonl => {
                for row in rows {
                    serde_json::to_writer(&mut self.writer, row)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.rows_written += rows.len();
        Ok(())
    }

    /// Get the number of rows written.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Truncate `path` and write the full report to it.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    rows: &[ReportRow],
) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut writer = ReportWriter::new(BufWriter::new(file), format);
    writer.write_all(rows)?;
    writer.flush().map_err(io_err)?;

    tracing::info!("Wrote {} row(s) to {:?}", writer.rows_written(), path);
    Ok(())
}
