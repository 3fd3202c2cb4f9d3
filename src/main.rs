//! Student Records - import, export and validate student records as CSV
//!
//! This CLI tool provides three operational modes:
//! - **Import**: read a CSV file and add its rows to a JSON store
//! - **Export**: write the store's students, or one student's certificates, to CSV
//! - **Validate**: report which rows an import would drop or default
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O error or validation failure |
//! | 4 | Store error, including an unreadable store file |

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use student_records::cli::{Args, Mode, RecordKind};
use student_records::error::RecordsError;
use student_records::store::JsonFileStore;
use student_records::transfer::{
    export_certificates, export_students, import_certificates, import_students,
};
use student_records::validator::CsvValidator;

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for validation failure (same as IO error)
const EXIT_VALIDATION_FAILURE: u8 = 3;
/// Exit code for store errors
const EXIT_STORE_ERROR: u8 = 4;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            if !matches!(e, RecordsError::ValidationFailed(_)) {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), RecordsError> {
    match args.mode {
        Mode::Validate => run_validate_mode(args),
        Mode::Import => run_import_mode(args),
        Mode::Export => run_export_mode(args),
    }
}

fn open_store(args: &Args) -> Result<JsonFileStore, RecordsError> {
    let path = args
        .store
        .as_ref()
        .ok_or_else(|| RecordsError::InvalidArgument("--store is required".to_string()))?;
    JsonFileStore::open(path)
}

fn student_id(args: &Args) -> Result<&str, RecordsError> {
    args.student_id
        .as_deref()
        .ok_or_else(|| RecordsError::InvalidArgument("--student-id is required".to_string()))
}

fn run_validate_mode(args: &Args) -> Result<(), RecordsError> {
    eprintln!("Validating {} file: {:?}", args.kind, args.file);

    let stats = CsvValidator::new(args.kind).validate(&args.file)?;
    println!("{}", stats);

    if stats.is_valid() {
        eprintln!(
            "Validation complete. All {} rows can be imported.",
            stats.valid_rows
        );
        Ok(())
    } else {
        eprintln!(
            "Validation failed. {} of {} rows would be skipped.",
            stats.skipped_rows, stats.total_rows
        );
        Err(RecordsError::ValidationFailed(format!(
            "{} rows would be skipped",
            stats.skipped_rows
        )))
    }
}

fn run_import_mode(args: &Args) -> Result<(), RecordsError> {
    let mut store = open_store(args)?;
    let source = BufReader::new(File::open(&args.file)?);

    let summary = match args.kind {
        RecordKind::Students => import_students(source, &mut store)?,
        RecordKind::Certificates => import_certificates(student_id(args)?, source, &mut store)?,
    };
    store.flush()?;

    println!("{}", summary);
    Ok(())
}

fn run_export_mode(args: &Args) -> Result<(), RecordsError> {
    let store = open_store(args)?;
    let sink = BufWriter::new(File::create(&args.file)?);

    let written = match args.kind {
        RecordKind::Students => export_students(&store, sink)?,
        RecordKind::Certificates => export_certificates(student_id(args)?, &store, sink)?,
    };

    println!("Exported {} {} to {:?}", written, args.kind, args.file);
    Ok(())
}

/// Maps an error to the process exit code.
fn error_to_exit_code(error: &RecordsError) -> u8 {
    match error {
        RecordsError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        RecordsError::ValidationFailed(_) => EXIT_VALIDATION_FAILURE,
        RecordsError::Io(_) => EXIT_IO_ERROR,
        RecordsError::Csv(_) => EXIT_IO_ERROR,
        RecordsError::Json(_) => EXIT_STORE_ERROR,
        RecordsError::Store(_) => EXIT_STORE_ERROR,
    }
}
