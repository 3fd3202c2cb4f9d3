use std::io::{self, Write};

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use super::{CERTIFICATE_HEADER, DATE_FORMAT, STUDENT_HEADER};
use crate::error::RecordsError;
use crate::model::{Certificate, Student};

/// Builds the CSV writer shared by both schemas.
///
/// `QuoteStyle::Necessary` quotes a field only when it contains the
/// delimiter, a double quote or a line break, doubling any inner quotes.
/// Line breaks never reach the writer (see [`single_line`]), so in practice
/// a field is quoted exactly when it contains a comma or a double quote.
fn csv_writer<W: Write>(sink: W) -> Writer<W> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Replaces embedded line breaks with a single space.
///
/// The parser reads one record per physical line, so a value spanning lines
/// could not be read back.
fn single_line(value: &str) -> String {
    if value.contains(|c: char| c == '\r' || c == '\n') {
        value
            .replace("\r\n", " ")
            .replace(|c: char| c == '\r' || c == '\n', " ")
    } else {
        value.to_string()
    }
}

/// Renders a GPA so that whole numbers keep their decimal point (`4.0`).
fn format_gpa(gpa: f64) -> String {
    format!("{:?}", gpa)
}

/// Writes the student header and one row per record to `sink`.
///
/// Rows are written in the order given. Every line, the header included,
/// ends with `\n`.
pub fn write_students<W: Write>(records: &[Student], sink: W) -> Result<(), RecordsError> {
    let mut writer = csv_writer(sink);
    writer.write_record(STUDENT_HEADER)?;

    for student in records {
        writer.write_record([
            single_line(&student.student_id),
            single_line(&student.name),
            student.date_of_birth.format(DATE_FORMAT).to_string(),
            student.gender.to_string(),
            single_line(&student.address),
            single_line(&student.phone_number),
            single_line(&student.email),
            single_line(&student.major),
            student.year_of_study.to_string(),
            format_gpa(student.gpa),
            student.status.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Serializes students to CSV text.
///
/// An empty slice produces the header line alone.
///
/// # Example
///
/// ```
/// use student_records::csv_handler::serialize_students;
///
/// let csv = serialize_students(&[]).unwrap();
/// assert_eq!(
///     csv,
///     "studentId,name,dateOfBirth,gender,address,phoneNumber,email,major,yearOfStudy,gpa,status\n"
/// );
/// ```
pub fn serialize_students(records: &[Student]) -> Result<String, RecordsError> {
    let mut buffer = Vec::new();
    write_students(records, &mut buffer)?;
    into_text(buffer)
}

/// Writes the certificate header and one row per record to `sink`.
///
/// A certificate without an expiry date gets an empty `expiryDate` cell.
pub fn write_certificates<W: Write>(
    records: &[Certificate],
    sink: W,
) -> Result<(), RecordsError> {
    let mut writer = csv_writer(sink);
    writer.write_record(CERTIFICATE_HEADER)?;

    for certificate in records {
        let expiry = certificate
            .expiry_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default();

        writer.write_record([
            single_line(&certificate.student_id),
            single_line(&certificate.name),
            single_line(&certificate.issuing_organization),
            certificate.issue_date.format(DATE_FORMAT).to_string(),
            expiry,
            single_line(&certificate.certificate_url),
            single_line(&certificate.description),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Serializes certificates to CSV text.
pub fn serialize_certificates(records: &[Certificate]) -> Result<String, RecordsError> {
    let mut buffer = Vec::new();
    write_certificates(records, &mut buffer)?;
    into_text(buffer)
}

fn into_text(buffer: Vec<u8>) -> Result<String, RecordsError> {
    String::from_utf8(buffer)
        .map_err(|e| RecordsError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
