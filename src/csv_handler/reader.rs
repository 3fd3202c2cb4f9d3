use std::str::FromStr;

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::report::{FieldFallback, ParseReport, SkippedRow};
use super::{CERTIFICATE_HEADER, DATE_FORMAT, STUDENT_HEADER};
use crate::error::RowError;
use crate::model::{Certificate, Gender, Student, StudentStatus};

/// Quoting state while splitting a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Normal,
    InQuotes,
}

/// Splits one CSV line into trimmed fields.
///
/// A `"` toggles quoted mode; inside quotes a comma is literal and `""`
/// stands for one literal quote. Each field is trimmed after unquoting.
/// The line must not contain a line break.
///
/// # Errors
///
/// Returns [`RowError::UnterminatedQuote`] when the line ends inside a
/// quoted field.
///
/// # Examples
///
/// ```
/// use student_records::csv_handler::split_row;
///
/// let fields = split_row(r#"S1, "Nguyen, Van A" ,"Say ""hi""""#).unwrap();
/// assert_eq!(fields, vec!["S1", "Nguyen, Van A", r#"Say "hi""#]);
///
/// assert!(split_row(r#"S1,"never closed"#).is_err());
/// ```
pub fn split_row(line: &str) -> Result<Vec<String>, RowError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = SplitState::Normal;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (state, c) {
            (SplitState::Normal, '"') => state = SplitState::InQuotes,
            (SplitState::InQuotes, '"') => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    state = SplitState::Normal;
                }
            }
            (SplitState::Normal, ',') => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            (_, c) => field.push(c),
        }
    }

    if state == SplitState::InQuotes {
        return Err(RowError::UnterminatedQuote {
            column: fields.len(),
        });
    }

    fields.push(field.trim().to_string());
    Ok(fields)
}

/// Field access and coercion for one split row.
///
/// Missing columns read as blank. Non-blank values that fail coercion are
/// replaced by the column default and recorded as fallbacks.
struct RowDecoder<'a> {
    fields: &'a [String],
    header: &'static [&'static str],
    line_number: u64,
    today: NaiveDate,
    fallbacks: Vec<FieldFallback>,
}

impl<'a> RowDecoder<'a> {
    fn raw(&self, index: usize) -> &'a str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    fn fallback(&mut self, index: usize, value: &str) {
        let fallback = FieldFallback {
            line_number: self.line_number,
            column: self.header[index],
            value: value.to_string(),
        };
        debug!("{}", fallback);
        self.fallbacks.push(fallback);
    }

    /// Parses `index` with `FromStr`, falling back to `default` when blank or
    /// unparseable.
    fn parsed_or<T: FromStr>(&mut self, index: usize, default: T) -> T {
        let raw = self.raw(index);
        if raw.is_empty() {
            return default;
        }
        match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                self.fallback(index, raw);
                default
            }
        }
    }

    /// Blank or unparseable dates become today.
    fn date(&mut self, index: usize) -> NaiveDate {
        self.optional_date(index).unwrap_or(self.today)
    }

    /// Parses a count that must be at least 1. Blank yields `default`;
    /// zero, negative or unparseable values yield `default` and are recorded.
    fn positive_or(&mut self, index: usize, default: u32) -> u32 {
        let raw = self.raw(index);
        if raw.is_empty() {
            return default;
        }
        match raw.parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                self.fallback(index, raw);
                default
            }
        }
    }

    /// Blank dates are `None`; unparseable non-blank dates become today.
    fn optional_date(&mut self, index: usize) -> Option<NaiveDate> {
        let raw = self.raw(index);
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fallback(index, raw);
                Some(self.today)
            }
        }
    }
}

/// Runs `decode` over every data line of `text`.
///
/// Blank lines are ignored. The first non-blank line is the header and is
/// dropped without inspection. Rows that cannot be split are recorded in
/// `skipped` and parsing continues with the next line.
fn parse_rows<T>(
    text: &str,
    header: &'static [&'static str],
    today: NaiveDate,
    mut decode: impl FnMut(&mut RowDecoder<'_>) -> T,
) -> ParseReport<T> {
    let mut report = ParseReport::default();

    let data_lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1);

    for (index, line) in data_lines {
        let line_number = index as u64 + 1;
        report.data_rows += 1;

        let fields = match split_row(line) {
            Ok(fields) => fields,
            Err(error) => {
                debug!("Skipping line {}: {}", line_number, error);
                report.skipped.push(SkippedRow { line_number, error });
                continue;
            }
        };

        let mut decoder = RowDecoder {
            fields: &fields,
            header,
            line_number,
            today,
            fallbacks: Vec::new(),
        };
        let record = decode(&mut decoder);
        report.fallbacks.append(&mut decoder.fallbacks);
        report.records.push(record);
    }

    report
}

fn decode_student(row: &mut RowDecoder<'_>) -> Student {
    Student {
        id: String::new(),
        student_id: row.text(0),
        name: row.text(1),
        date_of_birth: row.date(2),
        gender: row.parsed_or(3, Gender::Other),
        address: row.text(4),
        phone_number: row.text(5),
        email: row.text(6),
        major: row.text(7),
        year_of_study: row.positive_or(8, 1),
        gpa: row.parsed_or(9, 0.0),
        status: row.parsed_or(10, StudentStatus::Active),
    }
}

fn decode_certificate(student_id: &str, row: &mut RowDecoder<'_>) -> Certificate {
    Certificate {
        id: String::new(),
        student_id: student_id.to_string(),
        name: row.text(1),
        issuing_organization: row.text(2),
        issue_date: row.date(3),
        expiry_date: row.optional_date(4),
        certificate_url: row.text(5),
        description: row.text(6),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_students_at(text: &str, today: NaiveDate) -> ParseReport<Student> {
    parse_rows(text, &STUDENT_HEADER, today, decode_student)
}

pub(crate) fn parse_certificates_at(
    student_id: &str,
    text: &str,
    today: NaiveDate,
) -> ParseReport<Certificate> {
    parse_rows(text, &CERTIFICATE_HEADER, today, |row| {
        decode_certificate(student_id, row)
    })
}

/// Parses student CSV text, returning the records together with the rows
/// that were skipped and the values that were defaulted.
pub fn parse_students_report(text: &str) -> ParseReport<Student> {
    parse_students_at(text, today())
}

/// Parses student CSV text, best-effort per row.
///
/// Malformed rows are dropped silently; empty or header-only text yields an
/// empty list. Coercion defaults: gender `OTHER`, status `ACTIVE`,
/// yearOfStudy `1` (also for `0` and negative values), gpa `0.0`,
/// dateOfBirth today.
///
/// A `"` anywhere in a field opens a quoted section, so a row whose
/// unquoted value carries a stray quote (`Height 5'10"`) is malformed and
/// dropped rather than kept with the quote mangled. Quote such values on
/// export, as [`serialize_students`](super::serialize_students) does.
///
/// # Example
///
/// ```
/// use student_records::csv_handler::parse_students;
/// use student_records::model::StudentStatus;
///
/// let csv = "studentId,name,dateOfBirth,gender,address,phoneNumber,email,major,yearOfStudy,gpa,status\n\
///            S1,An,2002-01-31,male,,,,IT,2,3.1,graduated\n";
/// let students = parse_students(csv);
/// assert_eq!(students.len(), 1);
/// assert_eq!(students[0].status, StudentStatus::Graduated);
/// assert!(parse_students("").is_empty());
/// ```
pub fn parse_students(text: &str) -> Vec<Student> {
    parse_students_report(text).records
}

/// Parses certificate CSV text with diagnostics. See [`parse_certificates`].
pub fn parse_certificates_report(student_id: &str, text: &str) -> ParseReport<Certificate> {
    parse_certificates_at(student_id, text, today())
}

/// Parses certificate CSV text, best-effort per row.
///
/// Column 0 is ignored: every record gets `student_id`. A blank
/// `expiryDate` yields `None`; a blank or unparseable `issueDate` yields
/// today.
pub fn parse_certificates(student_id: &str, text: &str) -> Vec<Certificate> {
    parse_certificates_report(student_id, text).records
}
