//! Pipeline orchestration.
//!
//! Runs the linear sequence validate → merge → dedupe → build, accumulating
//! every human-readable line into one ordered report buffer. The buffer plus
//! a success flag are the only observable outputs besides the workbook
//! itself; non-fatal problems become report lines on the same buffer the
//! success path uses.

use crate::catalog::{Language, MessageKey, message};
use crate::dedupe::find_duplicates;
use crate::merge::merge_files;
use crate::report::{ReportBuilder, ReportConfig};
use crate::validate::validate_files;
use crate::{Result, banner_line};
use std::path::Path;

/// The result of one pipeline run.
///
/// `report` is the full newline-joined localized report, accumulated across
/// the whole run regardless of outcome.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Whether the run produced an output workbook.
    pub success: bool,
    /// Ordered, localized report text.
    pub report: String,
}

/// Orchestrates one processing run over a set of input files.
///
/// The pipeline is linear and single-threaded: files are validated, merged
/// in input order, scanned for duplicate titles, and written out as one
/// workbook. Construction is cheap; a pipeline can be reused across runs.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use metareview::{Language, Pipeline, ReportConfig};
///
/// let mut config = ReportConfig::new();
/// config.set_title_column("Article Title");
///
/// let pipeline = Pipeline::new().with_config(config);
/// let outcome = pipeline.run(&["a.csv", "b.csv"], Path::new("out.xlsx"), Language::En)?;
/// assert!(outcome.success);
/// # Ok::<(), metareview::ProcessingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ReportConfig,
}

impl Pipeline {
    /// Creates a pipeline with the default column configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline with custom title/date column names.
    #[must_use]
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Processes `inputs` and writes the workbook to `output`.
    ///
    /// Validation rejections, per-file ingestion failures, a missing title
    /// column and unextractable years all degrade to report lines; runs with
    /// no usable input resolve to a failed [`RunOutcome`] rather than an
    /// error. Only a failure to write the workbook returns `Err`.
    pub fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: &Path,
        language: Language,
    ) -> Result<RunOutcome> {
        let mut report: Vec<String> = Vec::new();
        report.push(String::new());
        report.push(banner_line());
        report.push(message(language, MessageKey::WindowTitle, &[]));
        report.push(banner_line());

        let (valid, problems) = validate_files(inputs, language);
        if !problems.is_empty() {
            report.push(String::new());
            report.push(format!("{}:", message(language, MessageKey::ReportTitle, &[])));
            for problem in &problems {
                report.push(format!(" - {problem}"));
            }
        }
        if valid.is_empty() {
            report.push(String::new());
            report.push(message(language, MessageKey::NoValidFiles, &[]));
            return Ok(RunOutcome {
                success: false,
                report: report.join("\n"),
            });
        }

        let merged = merge_files(&valid, language);
        for problem in &merged.problems {
            report.push(format!(" - {problem}"));
        }
        let Some(dataset) = merged.dataset else {
            report.push(String::new());
            report.push(message(language, MessageKey::NoValidFiles, &[]));
            return Ok(RunOutcome {
                success: false,
                report: report.join("\n"),
            });
        };

        let duplicates = find_duplicates(&dataset, self.config.title_column(), language);
        report.extend(duplicates.report_lines.iter().cloned());

        let builder = ReportBuilder::new().with_config(self.config.clone());
        let warnings = builder.build(&dataset, &duplicates, output, language)?;
        for warning in warnings {
            report.push(String::new());
            report.push(warning);
        }

        report.push(String::new());
        report.push(banner_line());
        report.push(message(language, MessageKey::ProcessCompleted, &[]));
        report.push(banner_line());

        report.push(String::new());
        report.push(message(
            language,
            MessageKey::OutputFile,
            &[&output.display().to_string()],
        ));
        report.push(message(
            language,
            MessageKey::TotalRecords,
            &[&dataset.len().to_string()],
        ));
        report.push(message(
            language,
            MessageKey::Duplicates,
            &[&duplicates.positions.len().to_string()],
        ));

        report.push(String::new());
        report.push(message(language, MessageKey::FileContents, &[]));
        report.push(message(language, MessageKey::AllSheetDescription, &[]));
        report.push(message(language, MessageKey::YearSheetsDescription, &[]));
        report.push(message(language, MessageKey::SummarySheetDescription, &[]));

        report.push(String::new());
        report.push(message(language, MessageKey::Footer, &[]));

        Ok(RunOutcome {
            success: true,
            report: report.join("\n"),
        })
    }
}

/// Processes files with the default configuration.
///
/// Convenience wrapper over [`Pipeline::run`]; see the crate documentation
/// for a usage example.
pub fn process_files<P: AsRef<Path>>(
    inputs: &[P],
    output: &Path,
    language: Language,
) -> Result<RunOutcome> {
    Pipeline::new().run(inputs, output, language)
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
    fn zero_valid_inputs_fail_without_writing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.xlsx");
        let missing = dir.path().join("missing.csv");

        let outcome = process_files(&[missing], &output, Language::En).unwrap();

        assert!(!outcome.success);
        assert!(outcome
            .report
            .contains("ERROR: No valid CSV files to process."));
        assert!(!output.exists());
    }

    #[test]
    fn cross_file_duplicates_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(
            dir.path(),
            "a.csv",
            "Title,Publication Year\nX,2020\nY,2021\n",
        );
        let b = write_file(
            dir.path(),
            "b.csv",
            "Title,Publication Year\nY,2021\nZ,2022\n",
        );
        let output = dir.path().join("report.xlsx");

        let outcome = process_files(&[a, b], &output, Language::En).unwrap();

        assert!(outcome.success);
        assert!(output.exists());
        assert!(outcome.report.contains("Total records processed: 4"));
        assert!(outcome.report.contains("Duplicate records identified: 2"));
        assert!(outcome.report.contains("Total duplicate records: 2"));
        assert!(outcome.report.contains("Unique duplicate articles: 1"));
        assert!(outcome.report.contains("  Y: 2"));
    }

    #[test]
    fn report_is_localized() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Title,Publication Year\nX,2020\n");
        let output = dir.path().join("report.xlsx");

        let outcome = process_files(&[a], &output, Language::Es).unwrap();

        assert!(outcome.success);
        assert!(outcome
            .report
            .contains("✓ Total de registros procesados: 1"));
        assert!(outcome.report.contains("- Hecho por: Ramiro Matta :)"));
    }

    #[test]
    fn rejections_and_results_share_one_report() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "good.csv", "Title,Publication Year\nX,2020\n");
        let missing = dir.path().join("gone.csv");
        let output = dir.path().join("report.xlsx");

        let outcome = process_files(&[good, missing.clone()], &output, Language::En).unwrap();

        assert!(outcome.success);
        let report = outcome.report;
        assert!(report.contains("Processing Report:"));
        assert!(report.contains(&format!(" - File not found: {}", missing.display())));
        assert!(report.contains("Output file:"));
        // Rejections come before the completion banner.
        let rejection = report.find("File not found").unwrap();
        let completed = report.find("PROCESS COMPLETED").unwrap();
        assert!(rejection < completed);
    }

    #[test]
    fn missing_title_column_is_a_degraded_run_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Name,Publication Year\nX,2020\n");
        let output = dir.path().join("report.xlsx");

        let outcome = process_files(&[a], &output, Language::En).unwrap();

        assert!(outcome.success);
        assert!(outcome.report.contains("⚠ Warning: Column 'Title' not found"));
        assert!(outcome.report.contains("Duplicate records identified: 0"));
    }

    #[test]
    fn missing_date_column_still_yields_year_sheets_from_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let with_dates = write_file(
            dir.path(),
            "dated.csv",
            "Title,Publication Year\nX,2020\nY,2021\n",
        );
        let without_dates = write_file(dir.path(), "undated.csv", "Title\nY\n");
        let output = dir.path().join("report.xlsx");

        let outcome = process_files(&[with_dates, without_dates], &output, Language::En).unwrap();

        assert!(outcome.success);
        assert!(output.exists());
        assert!(outcome.report.contains("Total records processed: 3"));
        assert!(outcome.report.contains("Duplicate records identified: 2"));
        // Years were extractable, so no degraded-years warning.
        assert!(!outcome.report.contains("No valid years"));
    }

    #[test]
    fn header_banner_opens_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.xlsx");
        let outcome =
            process_files(&[dir.path().join("none.csv")], &output, Language::En).unwrap();

        let lines: Vec<&str> = outcome.report.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "MetaReviewX");
        assert_eq!(lines[3], "=".repeat(60));
    }
}
