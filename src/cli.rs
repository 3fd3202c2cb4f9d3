//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the [`Mode`] enum for operation modes and the
//! [`Args`] struct containing all CLI arguments with validation logic.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub use crate::validator::RecordKind;

/// Operation mode for the student records tool.
///
/// - **Import**: read a CSV file and add its rows to the store
/// - **Export**: write the store's records to a CSV file
/// - **Validate**: report what an import of a CSV file would keep, drop or default
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Import records from a CSV file into the store
    Import,
    /// Export records from the store to a CSV file
    Export,
    /// Validate a CSV file without importing it
    Validate,
}

/// Command-line arguments for the student records tool.
///
/// Call [`Args::validate`] after parsing to check argument combinations.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use student_records::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "student-records")]
#[command(about = "Import, export and validate student records as CSV")]
#[command(version)]
pub struct Args {
    /// Operation mode: import, export, or validate
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Record kind the CSV file holds
    #[arg(long, value_enum, default_value = "students")]
    pub kind: RecordKind,

    /// CSV file to read (import, validate) or write (export)
    #[arg(long)]
    pub file: PathBuf,

    /// JSON store file (required for import and export)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Student the certificates belong to (required for certificate import and export)
    #[arg(long)]
    pub student_id: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// - `--store` is required for import and export
    /// - `--student-id` is required for certificate import and export
    /// - `--student-id`, when given, must not be blank
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the argument combination is valid
    /// - `Err(String)` with a descriptive error message if validation fails
    pub fn validate(&self) -> Result<(), String> {
        if let Some(student_id) = &self.student_id {
            if student_id.trim().is_empty() {
                return Err("--student-id must not be blank".to_string());
            }
        }

        if self.mode == Mode::Validate {
            return Ok(());
        }

        if self.store.is_none() {
            return Err(format!(
                "--store is required for {} mode",
                self.mode_name()
            ));
        }

        if self.kind == RecordKind::Certificates && self.student_id.is_none() {
            return Err(format!(
                "--student-id is required to {} certificates",
                self.mode_name()
            ));
        }

        Ok(())
    }

    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    fn mode_name(&self) -> &'static str {
        match self.mode {
            Mode::Import => "import",
            Mode::Export => "export",
            Mode::Validate => "validate",
        }
    }
}
