//! Multi-sheet XLSX report construction.
//!
//! The builder derives a publication year per record, then writes three
//! kinds of sheets:
//!
//! - an all-records sheet with duplicate rows filled yellow,
//! - one sheet per extracted year, ascending, without duplicate marking,
//! - a summary sheet with one aggregate row followed by one row per year.
//!
//! Rows whose year cannot be extracted stay on the all-records sheet but
//! appear on no per-year sheet. Saving the workbook is the only operation
//! in the whole pipeline allowed to fail the run.

use crate::catalog::{Language, MessageKey, message};
use crate::dedupe::DuplicateSummary;
use crate::year::extract_year;
use crate::{Dataset, Result};
use itertools::Itertools;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Fill applied to duplicate rows on the all-records sheet.
const DUPLICATE_FILL: &str = "#FFFF00";

/// XLSX caps sheet names at 31 characters.
const MAX_SHEET_NAME: usize = 31;

/// Margin added to the longest stringified value when sizing columns.
const COLUMN_MARGIN: usize = 2;

/// Configuration for report construction.
///
/// # Examples
///
/// ```
/// use metareview::ReportConfig;
///
/// let mut config = ReportConfig::new();
/// config.set_date_column("Date of Publication");
/// ```
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Column holding the date-like value years are derived from.
    date_column: String,
    /// Column holding the record title.
    title_column: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            date_column: "Publication Year".to_string(),
            title_column: "Title".to_string(),
        }
    }
}

impl ReportConfig {
    /// Creates a configuration with the default column names
    /// (`"Publication Year"` and `"Title"`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column years are derived from.
    pub fn set_date_column(&mut self, name: &str) -> &mut Self {
        self.date_column = name.to_string();
        self
    }

    /// Sets the column duplicate detection and unique-title counts use.
    pub fn set_title_column(&mut self, name: &str) -> &mut Self {
        self.title_column = name.to_string();
        self
    }

    /// The configured date column name.
    #[must_use]
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// The configured title column name.
    #[must_use]
    pub fn title_column(&self) -> &str {
        &self.title_column
    }
}

/// One aggregate row of the summary sheet.
///
/// The first row covers the whole dataset; subsequent rows cover one
/// extracted year each, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Year label, or the localized all-records label for the aggregate row.
    pub label: String,
    /// Record count in scope.
    pub total: usize,
    /// Distinct non-null titles in scope; `None` when the dataset has no
    /// title column (rendered as `"N/A"`).
    pub unique_titles: Option<usize>,
    /// Rows in scope that belong to the duplicate set.
    pub duplicate_count: usize,
    /// Comma-joined distinct sources in scope, first-appearance order.
    pub sources: String,
}

/// Builds and persists the multi-sheet workbook.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with a custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the workbook and writes it to `output`, overwriting any
    /// existing file.
    ///
    /// Returns localized warning lines for degraded conditions (currently
    /// only "no valid years"). An unwritable output path is the one fatal
    /// condition and propagates as an error.
    pub fn build(
        &self,
        dataset: &Dataset,
        duplicates: &DuplicateSummary,
        output: &Path,
        language: Language,
    ) -> Result<Vec<String>> {
        let years = self.derive_years(dataset);
        let distinct_years: Vec<i32> = years.iter().flatten().copied().sorted().dedup().collect();

        let mut warnings = Vec::new();
        if distinct_years.is_empty() {
            tracing::warn!("no extractable years, skipping per-year sheets");
            warnings.push(message(language, MessageKey::NoValidYears, &[]));
        }

        let duplicate_positions: HashSet<usize> = duplicates.positions.iter().copied().collect();
        let all_positions: Vec<usize> = (0..dataset.len()).collect();

        let mut workbook = Workbook::new();

        let all_sheet = workbook.add_worksheet();
        all_sheet.set_name(message(language, MessageKey::AllSheet, &[]))?;
        write_sheet(
            all_sheet,
            dataset,
            &all_positions,
            Some(&duplicate_positions),
        )?;

        let year_label = message(language, MessageKey::Year, &[]);
        for &year in &distinct_years {
            let positions: Vec<usize> = all_positions
                .iter()
                .copied()
                .filter(|&position| years[position] == Some(year))
                .collect();
            let sheet = workbook.add_worksheet();
            sheet.set_name(truncate_sheet_name(&format!("{year_label} {year}")))?;
            write_sheet(sheet, dataset, &positions, None)?;
        }

        let summary_sheet = workbook.add_worksheet();
        summary_sheet.set_name(message(language, MessageKey::SummarySheet, &[]))?;
        let summary = self.scope_rows(
            dataset,
            &years,
            &distinct_years,
            &duplicate_positions,
            language,
        );
        write_summary(summary_sheet, &summary, language)?;

        workbook.save(output)?;
        tracing::debug!(file = %output.display(), sheets = distinct_years.len() + 2, "workbook saved");
        Ok(warnings)
    }

    /// Computes the summary-sheet rows without touching a workbook: the
    /// all-years aggregate first, then one row per extracted year in
    /// ascending order.
    #[must_use]
    pub fn summary_rows(
        &self,
        dataset: &Dataset,
        duplicates: &DuplicateSummary,
        language: Language,
    ) -> Vec<SummaryRow> {
        let years = self.derive_years(dataset);
        let distinct_years: Vec<i32> = years.iter().flatten().copied().sorted().dedup().collect();
        let duplicate_positions: HashSet<usize> = duplicates.positions.iter().copied().collect();
        self.scope_rows(dataset, &years, &distinct_years, &duplicate_positions, language)
    }

    fn derive_years(&self, dataset: &Dataset) -> Vec<Option<i32>> {
        dataset
            .rows
            .iter()
            .map(|row| row.get(&self.config.date_column).and_then(extract_year))
            .collect()
    }

    fn scope_rows(
        &self,
        dataset: &Dataset,
        years: &[Option<i32>],
        distinct_years: &[i32],
        duplicate_positions: &HashSet<usize>,
        language: Language,
    ) -> Vec<SummaryRow> {
        let all_positions: Vec<usize> = (0..dataset.len()).collect();
        let mut scopes: Vec<(String, Vec<usize>)> = Vec::with_capacity(distinct_years.len() + 1);
        scopes.push((message(language, MessageKey::AllSheet, &[]), all_positions));
        for &year in distinct_years {
            let positions = (0..dataset.len())
                .filter(|&position| years[position] == Some(year))
                .collect();
            scopes.push((year.to_string(), positions));
        }

        scopes
            .into_iter()
            .map(|(label, positions)| SummaryRow {
                label,
                total: positions.len(),
                unique_titles: self.unique_titles(dataset, &positions),
                duplicate_count: positions
                    .iter()
                    .filter(|position| duplicate_positions.contains(*position))
                    .count(),
                sources: positions
                    .iter()
                    .filter_map(|&position| dataset.rows[position].source())
                    .unique()
                    .join(", "),
            })
            .collect()
    }

    /// Distinct non-null titles in scope, or `None` when the dataset has
    /// no title column at all.
    fn unique_titles(&self, dataset: &Dataset, positions: &[usize]) -> Option<usize> {
        if !dataset.has_column(&self.config.title_column) {
            return None;
        }
        Some(
            positions
                .iter()
                .filter_map(|&position| dataset.rows[position].get(&self.config.title_column))
                .unique()
                .count(),
        )
    }
}

/// Renders the summary rows onto the summary sheet.
fn write_summary(sheet: &mut Worksheet, summary: &[SummaryRow], language: Language) -> Result<()> {
    let headers = [
        message(language, MessageKey::Year, &[]),
        message(language, MessageKey::TotalArticles, &[]),
        message(language, MessageKey::UniqueArticles, &[]),
        message(language, MessageKey::DuplicateCount, &[]),
        message(language, MessageKey::Sources, &[]),
    ];

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for (column, header) in headers.iter().enumerate() {
        sheet.write_string(0, column as u16, header)?;
    }

    for (row_index, entry) in summary.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let unique = match entry.unique_titles {
            Some(count) => {
                sheet.write_number(row, 2, count as f64)?;
                count.to_string()
            }
            None => {
                sheet.write_string(row, 2, "N/A")?;
                "N/A".to_string()
            }
        };

        sheet.write_string(row, 0, &entry.label)?;
        sheet.write_number(row, 1, entry.total as f64)?;
        sheet.write_number(row, 3, entry.duplicate_count as f64)?;
        sheet.write_string(row, 4, &entry.sources)?;

        let rendered = [
            entry.label.clone(),
            entry.total.to_string(),
            unique,
            entry.duplicate_count.to_string(),
            entry.sources.clone(),
        ];
        for (column, value) in rendered.iter().enumerate() {
            widths[column] = widths[column].max(value.chars().count());
        }
    }

    apply_column_widths(sheet, &widths)?;
    Ok(())
}

/// Writes one data sheet: a header row, then the dataset rows at the given
/// positions. When `highlight` is set, rows at those dataset positions get
/// the duplicate fill across every column. Columns are sized to their
/// longest stringified value.
fn write_sheet(
    sheet: &mut Worksheet,
    dataset: &Dataset,
    positions: &[usize],
    highlight: Option<&HashSet<usize>>,
) -> Result<()> {
    let fill = Format::new().set_background_color(DUPLICATE_FILL);
    let mut widths: Vec<usize> = dataset.columns.iter().map(|c| c.chars().count()).collect();

    for (column, name) in dataset.columns.iter().enumerate() {
        sheet.write_string(0, column as u16, name)?;
    }

    for (row_index, &position) in positions.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let highlighted = highlight.is_some_and(|set| set.contains(&position));
        for (column, name) in dataset.columns.iter().enumerate() {
            let value = dataset.rows[position].get(name);
            match (value, highlighted) {
                (Some(value), true) => {
                    sheet.write_string_with_format(row, column as u16, value, &fill)?;
                }
                (Some(value), false) => {
                    sheet.write_string(row, column as u16, value)?;
                }
                // The fill must cover the full row, null cells included.
                (None, true) => {
                    sheet.write_blank(row, column as u16, &fill)?;
                }
                (None, false) => {}
            }
            if let Some(value) = value {
                widths[column] = widths[column].max(value.chars().count());
            }
        }
    }

    apply_column_widths(sheet, &widths)?;
    Ok(())
}

fn apply_column_widths(sheet: &mut Worksheet, widths: &[usize]) -> Result<()> {
    for (column, width) in widths.iter().enumerate() {
        sheet.set_column_width(column as u16, (width + COLUMN_MARGIN) as f64)?;
    }
    Ok(())
}

fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}
