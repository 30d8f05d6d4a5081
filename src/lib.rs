//! Merge bibliographic CSV exports into a single year-organized Excel report.
//!
//! `metareview` takes the CSV files exported by different literature databases
//! (Scopus, Web of Science, PubMed exports, ...), merges them into one dataset
//! with per-record provenance, flags records that share a title, and writes a
//! multi-sheet XLSX workbook:
//!
//! - an **all-records sheet** with duplicate rows highlighted,
//! - **one sheet per publication year**, derived from a heterogeneous
//!   date field with tolerant parsing,
//! - a **summary sheet** with per-year record, unique-title, duplicate and
//!   source statistics.
//!
//! Every user-facing message is localized (English and Spanish) and collected
//! into a single ordered report text, so a thin presentation layer only needs
//! to display the report and the success flag.
//!
//! # Basic Usage
//!
//! ```no_run
//! use std::path::Path;
//! use metareview::{process_files, Language};
//!
//! let inputs = ["scopus.csv", "wos.csv"];
//! let outcome = process_files(&inputs, Path::new("report.xlsx"), Language::En)?;
//!
//! if outcome.success {
//!     println!("{}", outcome.report);
//! }
//! # Ok::<(), metareview::ProcessingError>(())
//! ```
//!
//! # Error Handling
//!
//! Almost nothing in the pipeline is fatal: missing files, non-CSV paths,
//! unparseable files, a missing title column and unextractable years all
//! degrade to report lines while the run continues. Only a failure to write
//! the output workbook surfaces as a [`ProcessingError`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod catalog;
pub mod dedupe;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod validate;
pub mod year;

// Reexports
pub use catalog::Language;
pub use pipeline::{Pipeline, RunOutcome, process_files};
pub use report::{ReportBuilder, ReportConfig, SummaryRow};

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Name of the synthetic provenance column added to every merged record.
pub const SOURCE_COLUMN: &str = "Source";

/// Represents errors that abort a pipeline run.
///
/// Per-file and per-field problems never surface here; they become report
/// lines instead. This type is reserved for failures that end the run
/// abnormally, which in practice means writing the output workbook.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// One row of bibliographic data.
///
/// Records carry an open set of named fields; the schema varies by source
/// file and nothing beyond a title-like and a date-like field is expected.
/// Empty cells, and columns a source file does not have, are simply absent
/// from the map, which is how the rest of the pipeline models "null".
///
/// The provenance of the record lives in the [`SOURCE_COLUMN`] field, set
/// during merging to the originating file's base name without extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field, or `None` when the field is null.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Sets a field value. Empty values are treated as null and not stored.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.fields.insert(field.into(), value);
        }
    }

    /// Returns the originating file's base name, if tagged.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.get(SOURCE_COLUMN)
    }
}

/// The ordered collection of all records across all valid input files.
///
/// `columns` is the union of every source file's columns in first-appearance
/// order, with [`SOURCE_COLUMN`] last. Row order within a file is preserved
/// and files are concatenated in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Union of all source columns, in first-appearance order.
    pub columns: Vec<String>,
    /// All records, in concatenation order.
    pub rows: Vec<Record>,
}

impl Dataset {
    /// Number of records in the dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` when any source file carried the named column.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Adds a column to the union if it is not already present.
    pub(crate) fn add_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }
}

/// Width of the `=` rule lines used in report banners.
pub(crate) const RULE_WIDTH: usize = 60;

pub(crate) fn banner_line() -> String {
    "=".repeat(RULE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_values_are_null() {
        let mut record = Record::new();
        record.set("Title", "");
        record.set("Year", "2021");
        assert_eq!(record.get("Title"), None);
        assert_eq!(record.get("Year"), Some("2021"));
    }

    #[test]
    fn source_reads_provenance_column() {
        let mut record = Record::new();
        record.set(SOURCE_COLUMN, "scopus_export");
        assert_eq!(record.source(), Some("scopus_export"));
    }

    #[test]
    fn column_union_is_order_preserving() {
        let mut dataset = Dataset::default();
        dataset.add_column("Title");
        dataset.add_column("Authors");
        dataset.add_column("Title");
        assert_eq!(dataset.columns, vec!["Title", "Authors"]);
    }

    #[test]
    fn processing_error_display() {
        let error = ProcessingError::Io(std::io::Error::other("disk full"));
        assert_eq!(error.to_string(), "IO error: disk full");
    }
}
