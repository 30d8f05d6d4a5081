//! Multi-file CSV ingestion with provenance tagging.
//!
//! Each valid file is read as delimited text with automatic delimiter
//! detection, every row is tagged with the originating file's base name in
//! the [`SOURCE_COLUMN`](crate::SOURCE_COLUMN) field, and all rows are
//! concatenated into one [`Dataset`] preserving per-file row order and
//! file-input order. Files that fail to parse are skipped with a localized
//! report line; only a run where *no* file could be ingested yields an
//! empty outcome.

use crate::catalog::{Language, MessageKey, message};
use crate::{Dataset, ProcessingError, Record, Result, SOURCE_COLUMN};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Delimiters considered during sniffing, in tie-break priority order.
const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Result of merging the valid input files.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// The merged dataset, or `None` when no file yielded tabular data.
    pub dataset: Option<Dataset>,
    /// Localized skip messages, one per file that failed to ingest.
    pub problems: Vec<String>,
}

/// Loads and concatenates the given CSV files into one dataset.
///
/// The dataset's column set is the union of all files' columns in
/// first-appearance order, with the synthetic provenance column last.
/// Records from files lacking a column simply have no value for it.
///
/// Ingestion failures are per-file and non-fatal: the file is skipped, a
/// localized message naming the file and the cause is recorded, and the
/// remaining files are still processed. When zero files can be ingested the
/// outcome carries no dataset, which the pipeline treats as a distinct
/// empty-result condition rather than an error.
#[must_use]
pub fn merge_files<P: AsRef<Path>>(paths: &[P], language: Language) -> MergeOutcome {
    let mut dataset = Dataset::default();
    let mut ingested_any = false;
    let mut problems = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match read_file(path) {
            Ok((columns, records)) => {
                tracing::debug!(file = %path.display(), rows = records.len(), "ingested file");
                for column in &columns {
                    dataset.add_column(column);
                }
                dataset.rows.extend(records);
                ingested_any = true;
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), %error, "skipping file");
                problems.push(message(
                    language,
                    MessageKey::ProcessingFailed,
                    &[&path.display().to_string(), &error.to_string()],
                ));
            }
        }
    }

    if !ingested_any {
        return MergeOutcome {
            dataset: None,
            problems,
        };
    }

    dataset.add_column(SOURCE_COLUMN);
    MergeOutcome {
        dataset: Some(dataset),
        problems,
    }
}

/// Reads one CSV file into its header list and provenance-tagged records.
fn read_file(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let text = fs::read_to_string(path)?;
    let delimiter = sniff_delimiter(&text);
    let source = file_stem(path);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(ProcessingError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "no header row",
        )));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut record = Record::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            // Cell values are stored verbatim; only the empty string is
            // null. Trimming would merge whitespace variants of a title
            // and silently change the duplicate statistics.
            record.set(header.clone(), value);
        }
        record.set(SOURCE_COLUMN, source.clone());
        records.push(record);
    }

    Ok((headers, records))
}

/// Picks the most plausible delimiter by counting candidates in the header
/// line. Ties and an absent signal both resolve to a comma.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|line| !line.trim().is_empty());
    let Some(header) = header else { return b',' };

    let mut best = b',';
    let mut best_count = 0;
    for &candidate in CANDIDATE_DELIMITERS {
        let count = header.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn merges_files_with_column_union_and_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let scopus = write_file(
            dir.path(),
            "scopus.csv",
            "Title,Publication Year\nPaper A,2020\nPaper B,2021\n",
        );
        let wos = write_file(
            dir.path(),
            "wos.csv",
            "Title,Authors\nPaper C,Smith J\n",
        );

        let outcome = merge_files(&[scopus, wos], Language::En);
        let dataset = outcome.dataset.unwrap();

        assert_eq!(
            dataset.columns,
            vec!["Title", "Publication Year", "Authors", SOURCE_COLUMN]
        );
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows[0].get("Title"), Some("Paper A"));
        assert_eq!(dataset.rows[0].source(), Some("scopus"));
        assert_eq!(dataset.rows[2].source(), Some("wos"));
        // wos.csv has no date column: the value is null, not empty.
        assert_eq!(dataset.rows[2].get("Publication Year"), None);
        assert!(outcome.problems.is_empty());
    }

    #[test]
    fn cell_whitespace_is_preserved_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Title\n\"X \"\n");
        let b = write_file(dir.path(), "b.csv", "Title\nX\n");

        let outcome = merge_files(&[a, b], Language::En);
        let dataset = outcome.dataset.unwrap();

        assert_eq!(dataset.rows[0].get("Title"), Some("X "));
        assert_eq!(dataset.rows[1].get("Title"), Some("X"));

        // The trailing-space title is not a duplicate of its trimmed twin.
        let summary = crate::dedupe::find_duplicates(&dataset, "Title", Language::En);
        assert!(summary.positions.is_empty());
    }

    #[test]
    fn detects_semicolon_and_tab_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        let semicolon = write_file(dir.path(), "a.csv", "Title;Year\nPaper A;2020\n");
        let tab = write_file(dir.path(), "b.csv", "Title\tYear\nPaper B\t2021\n");

        let outcome = merge_files(&[semicolon, tab], Language::En);
        let dataset = outcome.dataset.unwrap();

        assert_eq!(dataset.rows[0].get("Year"), Some("2020"));
        assert_eq!(dataset.rows[1].get("Year"), Some("2021"));
    }

    #[test]
    fn skips_unreadable_files_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "good.csv", "Title\nPaper A\n");
        let bad = dir.path().join("bad.csv");
        fs::write(&bad, [0xFF, 0xFE, 0x00, 0x41]).unwrap();

        let outcome = merge_files(&[bad.clone(), good], Language::En);
        let dataset = outcome.dataset.unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(outcome.problems.len(), 1);
        assert!(outcome.problems[0].starts_with(&format!("Error processing {}", bad.display())));
    }

    #[test]
    fn no_ingestable_file_yields_no_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        fs::write(&bad, [0xFF, 0xFE]).unwrap();

        let outcome = merge_files(&[bad], Language::Es);
        assert!(outcome.dataset.is_none());
        assert_eq!(outcome.problems.len(), 1);
    }

    #[test]
    fn reordering_inputs_reorders_rows_identically() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Title\nX\nY\n");
        let b = write_file(dir.path(), "b.csv", "Title\nZ\n");

        let forward = merge_files(&[a.clone(), b.clone()], Language::En)
            .dataset
            .unwrap();
        let reverse = merge_files(&[b, a], Language::En).dataset.unwrap();

        let titles = |d: &Dataset| -> Vec<String> {
            d.rows
                .iter()
                .map(|r| r.get("Title").unwrap_or_default().to_string())
                .collect()
        };
        assert_eq!(titles(&forward), vec!["X", "Y", "Z"]);
        assert_eq!(titles(&reverse), vec!["Z", "X", "Y"]);
    }
}
