//! Duplicate detection by exact title match.
//!
//! Rows sharing a non-null title with at least one other row form the
//! duplicate set. Matching is deliberately exact and case-sensitive: the
//! source exports this tool targets repeat titles verbatim, and merging
//! case or whitespace variants would silently change the statistics.
//!
//! # Example
//!
//! ```
//! use metareview::dedupe::find_duplicates;
//! use metareview::{Dataset, Language, Record};
//!
//! let mut dataset = Dataset::default();
//! dataset.columns = vec!["Title".to_string()];
//! for title in ["X", "Y", "Y"] {
//!     let mut record = Record::new();
//!     record.set("Title", title);
//!     dataset.rows.push(record);
//! }
//!
//! let summary = find_duplicates(&dataset, "Title", Language::En);
//! assert_eq!(summary.positions, vec![1, 2]);
//! ```

use crate::catalog::{Language, MessageKey, message};
use crate::{Dataset, banner_line};
use std::collections::HashMap;

/// How many of the most-duplicated titles the report lists.
const TOP_TITLE_COUNT: usize = 10;

/// Duplicate positions and summary statistics for one dataset.
#[derive(Debug, Default)]
pub struct DuplicateSummary {
    /// Row positions belonging to a title shared by ≥ 2 rows, ascending.
    pub positions: Vec<usize>,
    /// Number of distinct titles that have duplicates.
    pub distinct_titles: usize,
    /// The most-duplicated titles with their occurrence counts, descending
    /// by count with first-occurrence order as tiebreak. At most ten
    /// entries.
    pub top_titles: Vec<(String, usize)>,
    /// Localized report block, empty when no duplicates exist.
    pub report_lines: Vec<String>,
}

/// Finds rows sharing an identical non-null title.
///
/// A missing title column is a degraded mode, not an error: the summary is
/// empty except for a localized warning line, and the run continues without
/// duplicate marking. Rows whose title is null never join a duplicate group.
///
/// Report lines are only produced when at least one duplicate exists.
#[must_use]
pub fn find_duplicates(
    dataset: &Dataset,
    title_column: &str,
    language: Language,
) -> DuplicateSummary {
    if !dataset.has_column(title_column) {
        tracing::warn!(column = title_column, "title column missing, skipping dedupe");
        return DuplicateSummary {
            report_lines: vec![message(language, MessageKey::NoTitleColumn, &[])],
            ..DuplicateSummary::default()
        };
    }

    // Count per title, remembering first-occurrence order for tiebreaks.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for row in &dataset.rows {
        if let Some(title) = row.get(title_column) {
            let count = counts.entry(title).or_insert(0);
            if *count == 0 {
                first_seen.push(title);
            }
            *count += 1;
        }
    }

    let positions: Vec<usize> = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.get(title_column)
                .is_some_and(|title| counts[title] >= 2)
        })
        .map(|(position, _)| position)
        .collect();

    let mut duplicated: Vec<(&str, usize)> = first_seen
        .iter()
        .map(|&title| (title, counts[title]))
        .filter(|&(_, count)| count >= 2)
        .collect();
    // Stable sort: first-occurrence order survives as the tiebreak.
    duplicated.sort_by(|a, b| b.1.cmp(&a.1));

    let distinct_titles = duplicated.len();
    let top_titles: Vec<(String, usize)> = duplicated
        .into_iter()
        .take(TOP_TITLE_COUNT)
        .map(|(title, count)| (title.to_string(), count))
        .collect();

    let mut report_lines = Vec::new();
    if !positions.is_empty() {
        report_lines.push(String::new());
        report_lines.push(banner_line());
        report_lines.push(message(language, MessageKey::DuplicatesReport, &[]));
        report_lines.push(banner_line());
        report_lines.push(message(
            language,
            MessageKey::TotalDuplicates,
            &[&positions.len().to_string()],
        ));
        report_lines.push(message(
            language,
            MessageKey::UniqueDuplicates,
            &[&distinct_titles.to_string()],
        ));
        report_lines.push(String::new());
        report_lines.push(message(language, MessageKey::TopDuplicates, &[]));
        for (title, count) in &top_titles {
            report_lines.push(format!("  {title}: {count}"));
        }
    }

    DuplicateSummary {
        positions,
        distinct_titles,
        top_titles,
        report_lines,
    }
}
