//! Integration tests for validating CSV files before import

use std::fs;

use tempfile::tempdir;

use student_records::csv_handler::serialize_certificates;
use student_records::error::RecordsError;
use student_records::model::Certificate;
use student_records::validator::{CsvValidator, RecordKind};

use chrono::NaiveDate;

#[test]
fn test_validate_clean_students_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.csv");
    fs::write(
        &path,
        "studentId,name,dateOfBirth,gender,address,phoneNumber,email,major,yearOfStudy,gpa,status\n\
         S1,An,2001-01-01,MALE,,,,IT,2,3.0,ACTIVE\n\
         S2,Binh,2002-02-02,FEMALE,,,,IT,1,2.5,INACTIVE\n",
    )
    .unwrap();

    let stats = CsvValidator::new(RecordKind::Students)
        .validate(&path)
        .unwrap();

    assert!(stats.is_valid());
    assert!(stats.header_matches);
    assert_eq!(stats.total_rows, 2);
    assert_eq!(stats.valid_rows, 2);
    assert_eq!(stats.fallback_values, 0);
    assert!(stats.to_string().contains("Status: PASSED"));
}

#[test]
fn test_validate_reports_skipped_rows_and_fallbacks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.csv");
    fs::write(
        &path,
        "studentId,name,dateOfBirth,gender,address,phoneNumber,email,major,yearOfStudy,gpa,status\n\
         S1,\"An,2001-01-01,MALE,,,,IT,2,3.0,ACTIVE\n\
         S2,Binh,2002-02-02,FEMALE,,,,IT,1,2.5,on-leave\n\
         S3,Chi,2002-02-30,FEMALE,,,,IT,1,2.5,ACTIVE\n",
    )
    .unwrap();

    let stats = CsvValidator::new(RecordKind::Students)
        .validate(&path)
        .unwrap();

    assert!(!stats.is_valid());
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.valid_rows, 2);
    assert_eq!(stats.skipped_rows, 1);
    assert_eq!(stats.fallback_values, 2);
    assert_eq!(stats.errors[0].line_number, 2);

    let columns: Vec<&str> = stats.warnings.iter().map(|w| w.column).collect();
    assert_eq!(columns, vec!["status", "dateOfBirth"]);

    let report = stats.to_string();
    assert!(report.contains("Status: FAILED"));
    assert!(report.contains("Line 2:"));
    assert!(report.contains("Line 3: status value \"on-leave\""));
}

#[test]
fn test_validate_exported_certificates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("certificates.csv");
    let certificate = Certificate {
        id: String::new(),
        student_id: "S1".to_string(),
        name: "AWS \"Cloud\" Practitioner".to_string(),
        issuing_organization: "Amazon, Inc.".to_string(),
        issue_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        expiry_date: Some(NaiveDate::from_ymd_opt(2027, 3, 1).unwrap()),
        certificate_url: String::new(),
        description: String::new(),
    };
    fs::write(&path, serialize_certificates(&[certificate]).unwrap()).unwrap();

    let stats = CsvValidator::new(RecordKind::Certificates)
        .validate(&path)
        .unwrap();

    assert!(stats.is_valid());
    assert!(stats.header_matches);
    assert_eq!(stats.valid_rows, 1);
    assert!(stats.warnings.is_empty());
}

#[test]
fn test_validate_wrong_schema_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("certificates.csv");
    fs::write(
        &path,
        "studentId,name,issuingOrganization,issueDate,expiryDate,certificateUrl,description\n",
    )
    .unwrap();

    let stats = CsvValidator::new(RecordKind::Students)
        .validate(&path)
        .unwrap();
    assert!(!stats.header_matches);
    assert!(stats.is_valid());
    assert!(stats.to_string().contains("unexpected"));
}

#[test]
fn test_validate_missing_file() {
    let dir = tempdir().unwrap();
    let result = CsvValidator::new(RecordKind::Students).validate(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(RecordsError::Io(_))));
}
