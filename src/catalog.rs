//! Localized message catalog.
//!
//! Every user-facing string the pipeline emits comes from a static
//! `(language, key) -> template` mapping, rendered with explicit positional
//! substitution. The language is threaded through every call as a plain
//! parameter, so no process-wide translation state exists.
//!
//! # Example
//!
//! ```
//! use metareview::catalog::{Language, MessageKey, message};
//!
//! let line = message(Language::Es, MessageKey::FileNotFound, &["refs.csv"]);
//! assert_eq!(line, "Archivo no encontrado: refs.csv");
//! ```

/// Supported report languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
}

impl Language {
    /// Resolves a language tag such as `"en"` or `"es"`.
    ///
    /// Unknown tags fall back to English, the application default.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "es" => Language::Es,
            _ => Language::En,
        }
    }
}

/// Keys for every message the pipeline can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Product title shown in the report header banner.
    WindowTitle,
    /// Heading for the file-rejection block.
    ReportTitle,
    /// A requested file does not exist. `{0}` = path.
    FileNotFound,
    /// A requested file is not a CSV. `{0}` = path.
    InvalidCsv,
    /// A file could not be ingested. `{0}` = path, `{1}` = cause.
    ProcessingFailed,
    /// No candidate file survived validation or ingestion.
    NoValidFiles,
    /// Completion banner text.
    ProcessCompleted,
    /// Output path line. `{0}` = path.
    OutputFile,
    /// Total record count line. `{0}` = count.
    TotalRecords,
    /// Duplicate record count line. `{0}` = count.
    Duplicates,
    /// Lead-in for the sheet-structure description.
    FileContents,
    /// Name of the all-records sheet.
    AllSheet,
    /// Description of the all-records sheet.
    AllSheetDescription,
    /// Description of the per-year sheets.
    YearSheetsDescription,
    /// Name of the summary sheet.
    SummarySheet,
    /// Description of the summary sheet.
    SummarySheetDescription,
    /// Attribution footer.
    Footer,
    /// Heading of the duplicate-statistics block.
    DuplicatesReport,
    /// Total duplicate rows line. `{0}` = count.
    TotalDuplicates,
    /// Distinct duplicated titles line. `{0}` = count.
    UniqueDuplicates,
    /// Lead-in for the top-10 duplicated titles list.
    TopDuplicates,
    /// Warning: the title column is missing.
    NoTitleColumn,
    /// Warning: no publication year could be extracted from any record.
    NoValidYears,
    /// "Year" label, used for sheet names and the summary header.
    Year,
    /// Summary header: total records per scope.
    TotalArticles,
    /// Summary header: distinct titles per scope.
    UniqueArticles,
    /// Summary header: duplicate rows per scope.
    DuplicateCount,
    /// Summary header: comma-joined distinct sources per scope.
    Sources,
}

/// Returns the format template for a `(language, key)` pair.
#[must_use]
pub fn template(language: Language, key: MessageKey) -> &'static str {
    use MessageKey::*;
    match language {
        Language::En => match key {
            WindowTitle => "MetaReviewX",
            ReportTitle => "Processing Report",
            FileNotFound => "File not found: {0}",
            InvalidCsv => "File is not CSV: {0}",
            ProcessingFailed => "Error processing {0}: {1}",
            NoValidFiles => "ERROR: No valid CSV files to process.",
            ProcessCompleted => "PROCESS COMPLETED",
            OutputFile => "Output file: {0}",
            TotalRecords => "Total records processed: {0}",
            Duplicates => "Duplicate records identified: {0}",
            FileContents => "The file contains:",
            AllSheet => "All",
            AllSheetDescription => "- Sheet 'All' with all articles (duplicates in yellow)",
            YearSheetsDescription => "- Sheets separated by year (without duplicate marking)",
            SummarySheet => "Summary",
            SummarySheetDescription => "- Sheet 'Summary' with statistics",
            Footer => "- Made by: Ramiro Matta :)",
            DuplicatesReport => "DUPLICATES REPORT",
            TotalDuplicates => "Total duplicate records: {0}",
            UniqueDuplicates => "Unique duplicate articles: {0}",
            TopDuplicates => "Top 10 most duplicated articles:",
            NoTitleColumn => "⚠ Warning: Column 'Title' not found",
            NoValidYears => "⚠ No valid years identified in the data",
            Year => "Year",
            TotalArticles => "Total Articles",
            UniqueArticles => "Unique Articles",
            DuplicateCount => "Duplicates",
            Sources => "Sources",
        },
        Language::Es => match key {
            WindowTitle => "MetaReviewX",
            ReportTitle => "Reporte de Procesamiento",
            FileNotFound => "Archivo no encontrado: {0}",
            InvalidCsv => "El archivo no es CSV: {0}",
            ProcessingFailed => "Error procesando {0}: {1}",
            NoValidFiles => "ERROR: No hay archivos CSV válidos para procesar.",
            ProcessCompleted => "PROCESO COMPLETADO",
            OutputFile => "✓ Archivo generado: {0}",
            TotalRecords => "✓ Total de registros procesados: {0}",
            Duplicates => "✓ Registros duplicados identificados: {0}",
            FileContents => "El archivo contiene:",
            AllSheet => "Todos",
            AllSheetDescription => {
                "- Hoja 'Todos' con todos los artículos (duplicados en amarillo)"
            }
            YearSheetsDescription => "- Hojas separadas por año (sin marcado de duplicados)",
            SummarySheet => "Resumen",
            SummarySheetDescription => "- Hoja 'Resumen' con estadísticas",
            Footer => "- Hecho por: Ramiro Matta :)",
            DuplicatesReport => "REPORTE DE DUPLICADOS",
            TotalDuplicates => "Total de registros duplicados: {0}",
            UniqueDuplicates => "Artículos únicos duplicados: {0}",
            TopDuplicates => "Top 10 artículos más duplicados:",
            NoTitleColumn => "⚠ Advertencia: No se encontró la columna 'Title'",
            NoValidYears => "⚠ No se pudieron identificar años válidos en los datos",
            Year => "Año",
            TotalArticles => "Total Artículos",
            UniqueArticles => "Artículos Únicos",
            DuplicateCount => "Duplicados",
            Sources => "Fuentes",
        },
    }
}

/// Renders a template, substituting `{0}`, `{1}`, ... with `args`.
///
/// Placeholders without a matching argument are left untouched.
#[must_use]
pub fn render(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}

/// Looks up and renders a message in one step.
#[must_use]
pub fn message(language: Language, key: MessageKey, args: &[&str]) -> String {
    render(template(language, key), args)
}
