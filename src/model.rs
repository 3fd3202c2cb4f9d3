//! Record types exchanged between the CSV codec, the record store and callers.
//!
//! Defines [`Student`] and [`Certificate`] together with the closed value
//! sets [`Gender`] and [`StudentStatus`]. Enum members render as their
//! upper-case names (`MALE`, `GRADUATED`) and parse case-insensitively.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name any member of an enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Gender of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Upper-case member name as written to CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Gender::Male, Gender::Female, Gender::Other]
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Suspended,
}

impl StudentStatus {
    /// Upper-case member name as written to CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
            StudentStatus::Graduated => "GRADUATED",
            StudentStatus::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            StudentStatus::Active,
            StudentStatus::Inactive,
            StudentStatus::Graduated,
            StudentStatus::Suspended,
        ]
        .into_iter()
        .find(|st| st.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownVariant {
            kind: "status",
            value: s.to_string(),
        })
    }
}

/// A student record.
///
/// `id` is the opaque identifier assigned by the record store and never
/// appears in CSV; records produced by the parser carry an empty `id`.
/// `student_id` is the human-meaningful business key.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use student_records::model::{Gender, Student, StudentStatus};
///
/// let student = Student {
///     id: String::new(),
///     student_id: "52100001".to_string(),
///     name: "Tran Thi B".to_string(),
///     date_of_birth: NaiveDate::from_ymd_opt(2003, 4, 9).unwrap(),
///     gender: Gender::Female,
///     address: "19 Nguyen Huu Tho".to_string(),
///     phone_number: "0901234567".to_string(),
///     email: "b@student.edu.vn".to_string(),
///     major: "Computer Science".to_string(),
///     year_of_study: 3,
///     gpa: 3.4,
///     status: StudentStatus::Active,
/// };
/// assert_eq!(student.gender.to_string(), "FEMALE");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier; empty until persisted.
    #[serde(default)]
    pub id: String,
    pub student_id: String,
    pub name: String,
    /// Calendar date only; time of day carries no meaning.
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub major: String,
    /// At least 1 for parsed records.
    pub year_of_study: u32,
    pub gpa: f64,
    pub status: StudentStatus,
}

/// A certificate held by a student.
///
/// `student_id` refers to [`Student::student_id`]. On CSV import it is
/// always supplied by the caller rather than read from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Store-assigned identifier; empty until persisted.
    #[serde(default)]
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: NaiveDate,
    /// Certificates without an expiry carry `None`.
    pub expiry_date: Option<NaiveDate>,
    pub certificate_url: String,
    pub description: String,
}
