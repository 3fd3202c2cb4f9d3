//! CSV handler module
//!
//! Converts [`Student`](crate::model::Student) and
//! [`Certificate`](crate::model::Certificate) records to and from CSV text.
//!
//! Columns are positional. The first line is always a header; it is written
//! on export and skipped, never interpreted, on import. Parsing is
//! best-effort per row: a row that cannot be split is dropped and the rest
//! of the text is still read. Use the `*_report` functions to find out which
//! rows were dropped and which values were replaced by defaults.

pub mod reader;
pub mod report;
pub mod writer;

pub use reader::{
    parse_certificates, parse_certificates_report, parse_students, parse_students_report,
    split_row,
};
pub use report::{FieldFallback, ParseReport, SkippedRow};
pub use writer::{
    serialize_certificates, serialize_students, write_certificates, write_students,
};

/// Date encoding used for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row of the student schema, in column order.
pub const STUDENT_HEADER: [&str; 11] = [
    "studentId",
    "name",
    "dateOfBirth",
    "gender",
    "address",
    "phoneNumber",
    "email",
    "major",
    "yearOfStudy",
    "gpa",
    "status",
];

/// Header row of the certificate schema, in column order.
pub const CERTIFICATE_HEADER: [&str; 7] = [
    "studentId",
    "name",
    "issuingOrganization",
    "issueDate",
    "expiryDate",
    "certificateUrl",
    "description",
];
