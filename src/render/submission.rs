//! CSV submission files: one `id,solution` row per document.
//!
//! `solution` is the compact JSON array of the document's cells. Rows are
//! flushed as soon as they are written so a crash never leaves a partial
//! row behind, and documents without cells are never written.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::json::{cells_from_json, cells_to_json, JsonFormat};
use crate::error::Result;
use crate::model::DocumentResult;

/// Column names of the submission file.
pub const SUBMISSION_HEADER: [&str; 2] = ["id", "solution"];

/// One row of a submission file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Document identifier
    pub id: String,
    /// Compact JSON array of cells
    pub solution: String,
}

/// Writes document results as submission rows.
pub struct SubmissionWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl SubmissionWriter<File> {
    /// Create (or truncate) a submission file and write its header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> SubmissionWriter<W> {
    /// Wrap a writer and write the header row.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(SUBMISSION_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Write one document's row. Returns `false` (and writes nothing) when
    /// the document has no cells.
    pub fn write_document(&mut self, result: &DocumentResult) -> Result<bool> {
        if result.is_empty() {
            return Ok(false);
        }
        let solution = cells_to_json(&result.cells, JsonFormat::Compact)?;
        self.writer.write_record([result.id.as_str(), solution.as_str()])?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(true)
    }

    /// Number of document rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

/// Read a submission back into document results, in file order.
pub fn read_submission<R: Read>(reader: R) -> Result<Vec<DocumentResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut results = Vec::new();
    for record in reader.deserialize::<SubmissionRecord>() {
        let record = record?;
        let mut result = DocumentResult::new(record.id);
        result.extend_page(cells_from_json(&record.solution)?);
        results.push(result);
    }
    Ok(results)
}

/// Read a submission file.
pub fn read_submission_file<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentResult>> {
    read_submission(File::open(path)?)
}
