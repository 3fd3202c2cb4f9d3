//! CSV import and export against a record store.
//!
//! These functions bracket the codec with stream I/O and per-record
//! persistence. Reading or writing the stream, or listing records, aborts
//! with an error. A store failure on a single imported record is logged and
//! counted, and the import carries on with the next record.

use std::fmt;
use std::io::{Read, Write};

use tracing::{info, warn};

use crate::csv_handler::{
    parse_certificates_report, parse_students_report, write_certificates, write_students,
};
use crate::error::RecordsError;
use crate::model::{Certificate, Student};
use crate::store::RecordStore;

/// Outcome of an import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records the store accepted.
    pub imported: u64,
    /// Data rows the parser dropped.
    pub skipped_rows: u64,
    /// Parsed records the store rejected.
    pub failed_writes: u64,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Imported {} records", self.imported)?;
        if self.skipped_rows > 0 {
            write!(f, ", skipped {} malformed rows", self.skipped_rows)?;
        }
        if self.failed_writes > 0 {
            write!(f, ", {} records could not be saved", self.failed_writes)?;
        }
        Ok(())
    }
}

/// Reads the whole source as text. Invalid UTF-8 sequences are replaced.
fn read_source<R: Read>(mut source: R) -> Result<String, RecordsError> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Persists each record with `save`, counting failures instead of aborting.
fn persist_all<T>(
    records: Vec<T>,
    mut save: impl FnMut(T) -> Result<String, RecordsError>,
) -> (u64, u64) {
    let mut imported = 0;
    let mut failed = 0;
    for record in records {
        match save(record) {
            Ok(_) => imported += 1,
            Err(e) => {
                warn!("Failed to save imported record: {}", e);
                failed += 1;
            }
        }
    }
    (imported, failed)
}

/// Imports students from CSV read from `source`.
pub fn import_students<R: Read, S: RecordStore + ?Sized>(
    source: R,
    store: &mut S,
) -> Result<ImportSummary, RecordsError> {
    let text = read_source(source)?;
    let report = parse_students_report(&text);
    let skipped_rows = report.skipped.len() as u64;

    let (imported, failed_writes) = persist_all(report.records, |student: Student| {
        store.create_student(Student {
            id: String::new(),
            ..student
        })
    });

    let summary = ImportSummary {
        imported,
        skipped_rows,
        failed_writes,
    };
    info!("Student import finished: {}", summary);
    Ok(summary)
}

/// Imports certificates for `student_id` from CSV read from `source`.
///
/// The `studentId` column of the file is ignored.
pub fn import_certificates<R: Read, S: RecordStore + ?Sized>(
    student_id: &str,
    source: R,
    store: &mut S,
) -> Result<ImportSummary, RecordsError> {
    let text = read_source(source)?;
    let report = parse_certificates_report(student_id, &text);
    let skipped_rows = report.skipped.len() as u64;

    let (imported, failed_writes) = persist_all(report.records, |certificate: Certificate| {
        store.create_certificate(Certificate {
            id: String::new(),
            ..certificate
        })
    });

    let summary = ImportSummary {
        imported,
        skipped_rows,
        failed_writes,
    };
    info!("Certificate import for {} finished: {}", student_id, summary);
    Ok(summary)
}

/// Exports every student to `sink`. Returns the number of rows written.
pub fn export_students<W: Write, S: RecordStore + ?Sized>(
    store: &S,
    sink: W,
) -> Result<usize, RecordsError> {
    let students = store.list_students()?;
    write_students(&students, sink)?;
    info!("Exported {} students", students.len());
    Ok(students.len())
}

/// Exports the certificates of `student_id` to `sink`, most recently issued
/// first. Returns the number of rows written.
pub fn export_certificates<W: Write, S: RecordStore + ?Sized>(
    student_id: &str,
    store: &S,
    sink: W,
) -> Result<usize, RecordsError> {
    let certificates = store.certificates_for_student(student_id)?;
    write_certificates(&certificates, sink)?;
    info!(
        "Exported {} certificates for {}",
        certificates.len(),
        student_id
    );
    Ok(certificates.len())
}
