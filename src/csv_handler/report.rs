//! Structured parse results.
//!
//! [`ParseReport`] carries the parsed records together with the rows that
//! were dropped ([`SkippedRow`]) and the values that were replaced by
//! defaults ([`FieldFallback`]).

use std::fmt;

use crate::error::RowError;

/// A data row that was dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Physical line number in the input text (1-indexed, header included).
    pub line_number: u64,
    /// Why the row could not be decoded.
    pub error: RowError,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line_number, self.error)
    }
}

/// A non-blank value that could not be coerced and was replaced by its
/// column default.
///
/// Blank values also take the default but are not reported; an empty cell
/// is the normal way to say "use the default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFallback {
    /// Physical line number in the input text (1-indexed, header included).
    pub line_number: u64,
    /// Header name of the column.
    pub column: &'static str,
    /// The raw (trimmed) value that was rejected.
    pub value: String,
}

impl fmt::Display for FieldFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: {} value \"{}\" not recognised, default used",
            self.line_number, self.column, self.value
        )
    }
}

/// Outcome of a best-effort parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    /// Successfully decoded records in source line order.
    pub records: Vec<T>,
    /// Number of non-blank data lines seen (header excluded).
    pub data_rows: u64,
    /// Rows that were dropped.
    pub skipped: Vec<SkippedRow>,
    /// Values replaced by column defaults in the rows that were kept.
    pub fallbacks: Vec<FieldFallback>,
}

impl<T> ParseReport<T> {
    /// Returns true if no row was dropped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl<T> Default for ParseReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            data_rows: 0,
            skipped: Vec::new(),
            fallbacks: Vec::new(),
        }
    }
}
