//! CSV Validation Module
//!
//! Checks a student or certificate CSV file the way an import would read it,
//! without touching any store. The report lists every row an import would
//! silently drop and every value that would be replaced by a default.
//!
//! # Example
//!
//! ```rust,ignore
//! use student_records::validator::{CsvValidator, RecordKind};
//! use std::path::Path;
//!
//! let validator = CsvValidator::new(RecordKind::Students);
//! let stats = validator.validate(Path::new("students.csv"))?;
//!
//! println!("{}", stats);
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;

use crate::csv_handler::{
    parse_certificates_report, parse_students_report, split_row, FieldFallback, SkippedRow,
    CERTIFICATE_HEADER, STUDENT_HEADER,
};
use crate::error::RecordsError;

/// Which CSV schema a file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    /// Student rows (11 columns)
    Students,
    /// Certificate rows (7 columns)
    Certificates,
}

impl RecordKind {
    /// Expected header columns for this schema.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Students => &STUDENT_HEADER,
            RecordKind::Certificates => &CERTIFICATE_HEADER,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Students => write!(f, "students"),
            RecordKind::Certificates => write!(f, "certificates"),
        }
    }
}

/// Statistics collected during validation.
#[derive(Debug, Default, Clone)]
pub struct ValidationStats {
    /// Non-blank data rows (header excluded).
    pub total_rows: u64,
    /// Rows an import would keep.
    pub valid_rows: u64,
    /// Rows an import would drop.
    pub skipped_rows: u64,
    /// Values an import would replace by a default.
    pub fallback_values: u64,
    /// Whether the first line matches the expected header. Informational:
    /// the header is never used to locate columns.
    pub header_matches: bool,
    /// One entry per dropped row.
    pub errors: Vec<SkippedRow>,
    /// One entry per defaulted value.
    pub warnings: Vec<FieldFallback>,
}

impl ValidationStats {
    /// Returns true if an import would keep every row.
    pub fn is_valid(&self) -> bool {
        self.skipped_rows == 0
    }
}

impl fmt::Display for ValidationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSV Validation Report")?;
        writeln!(f, "=====================")?;
        writeln!(
            f,
            "Status: {}",
            if self.is_valid() { "PASSED" } else { "FAILED" }
        )?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Total rows:        {:>10}", self.total_rows)?;
        writeln!(f, "  Valid rows:        {:>10}", self.valid_rows)?;
        writeln!(f, "  Skipped rows:      {:>10}", self.skipped_rows)?;
        writeln!(f, "  Defaulted values:  {:>10}", self.fallback_values)?;
        writeln!(
            f,
            "  Header:            {:>10}",
            if self.header_matches {
                "expected"
            } else {
                "unexpected"
            }
        )?;

        if !self.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for error in &self.errors {
                writeln!(f, "  {}", error)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }

        Ok(())
    }
}

/// Validates CSV files of one record kind.
#[derive(Debug, Clone, Copy)]
pub struct CsvValidator {
    kind: RecordKind,
}

impl CsvValidator {
    pub fn new(kind: RecordKind) -> Self {
        Self { kind }
    }

    /// Validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Only I/O failures are errors; malformed content is reported in the
    /// returned statistics.
    pub fn validate(&self, path: &Path) -> Result<ValidationStats, RecordsError> {
        let bytes = fs::read(path)?;
        Ok(self.validate_str(&String::from_utf8_lossy(&bytes)))
    }

    /// Validates CSV text.
    pub fn validate_str(&self, text: &str) -> ValidationStats {
        let (kept, skipped, fallbacks, total) = match self.kind {
            RecordKind::Students => {
                let report = parse_students_report(text);
                (
                    report.records.len(),
                    report.skipped,
                    report.fallbacks,
                    report.data_rows,
                )
            }
            RecordKind::Certificates => {
                // The student id does not influence which rows are kept
                let report = parse_certificates_report("", text);
                (
                    report.records.len(),
                    report.skipped,
                    report.fallbacks,
                    report.data_rows,
                )
            }
        };

        ValidationStats {
            total_rows: total,
            valid_rows: kept as u64,
            skipped_rows: skipped.len() as u64,
            fallback_values: fallbacks.len() as u64,
            header_matches: self.header_matches(text),
            errors: skipped,
            warnings: fallbacks,
        }
    }

    fn header_matches(&self, text: &str) -> bool {
        let Some(first) = text.lines().find(|line| !line.trim().is_empty()) else {
            return false;
        };
        match split_row(first) {
            Ok(columns) => columns
                .iter()
                .map(String::as_str)
                .eq(self.kind.header().iter().copied()),
            Err(_) => false,
        }
    }
}
