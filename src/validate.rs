//! Input file validation.
//!
//! Filters the requested file list into readable CSV candidates and localized
//! rejection messages before any ingestion work starts.

use crate::catalog::{Language, MessageKey, message};
use std::path::{Path, PathBuf};

/// Partitions candidate paths into valid CSV paths and rejection messages.
///
/// A path is valid when it exists on the filesystem and carries a
/// case-insensitive `.csv` extension. The existence check short-circuits:
/// a missing file is never also reported for its extension. `valid` keeps
/// the input order; `problems` holds one localized message per rejected
/// path, in input order.
///
/// Purely a filesystem probe; nothing is opened or read.
#[must_use]
pub fn validate_files<P: AsRef<Path>>(
    paths: &[P],
    language: Language,
) -> (Vec<PathBuf>, Vec<String>) {
    let mut valid = Vec::new();
    let mut problems = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            problems.push(message(language, MessageKey::FileNotFound, &[&display]));
        } else if !is_csv(path) {
            problems.push(message(language, MessageKey::InvalidCsv, &[&display]));
        } else {
            valid.push(path.to_path_buf());
        }
    }

    (valid, problems)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
