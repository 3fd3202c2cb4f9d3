//! Error module
//!
//! Defines the error types used across the student records crate.
//! [`RecordsError`] is the crate-wide error for anything that aborts an
//! operation. [`RowError`] describes why a single CSV row could not be
//! decoded; it never aborts a parse and only surfaces through
//! [`ParseReport`](crate::csv_handler::ParseReport).

use thiserror::Error;

/// The main error type for the student records library and CLI.
///
/// # Error Categories
///
/// - **Stream errors**: the CSV source cannot be read or the sink cannot be written
/// - **Store errors**: the record store rejected an operation
/// - **Configuration errors**: invalid command-line arguments
///
/// # Example
///
/// ```rust,ignore
/// use student_records::error::RecordsError;
///
/// fn example() -> Result<(), RecordsError> {
///     // Errors from underlying types are automatically converted
///     let file = std::fs::File::open("nonexistent.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum RecordsError {
    /// CSV encoding error from the csv crate.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    ///
    /// Raised when the CSV source cannot be read, the sink cannot be
    /// written, or the JSON store file cannot be opened or replaced.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading or saving the store file.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// CSV validation found rows that an import would skip.
    ///
    /// The validation report has already been printed; this error signals
    /// that the process should exit with code 3.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The record store rejected an operation.
    #[error("Store error: {0}")]
    Store(String),
}

/// Why a single CSV row was dropped during a best-effort parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A quoted field was opened but never closed on the same line.
    #[error("unterminated quoted field starting at column {column}")]
    UnterminatedQuote {
        /// Zero-based index of the field that opened the quote.
        column: usize,
    },
}
