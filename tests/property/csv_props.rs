//! Property-based tests for the student and certificate CSV codec

use chrono::NaiveDate;
use proptest::prelude::*;

use student_records::csv_handler::{
    parse_certificates, parse_students, parse_students_report, serialize_certificates,
    serialize_students, split_row, CERTIFICATE_HEADER, STUDENT_HEADER,
};
use student_records::model::{Certificate, Gender, Student, StudentStatus};

/// Strategy for free-text values that survive trimming and line splitting.
///
/// Values may contain commas, double quotes and inner spaces, but never a
/// line break or leading/trailing whitespace.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9@._/-]{1,12}".prop_map(|s| s),
        "[a-zA-Z0-9]([a-zA-Z0-9 ,\"@.]{0,20}[a-zA-Z0-9\"])?".prop_map(|s| s),
        Just("Nguyen, Van A".to_string()),
        Just(r#"Say "hi""#.to_string()),
        Just("Thủ Đức, TP.HCM".to_string()),
    ]
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1950i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

fn status_strategy() -> impl Strategy<Value = StudentStatus> {
    prop_oneof![
        Just(StudentStatus::Active),
        Just(StudentStatus::Inactive),
        Just(StudentStatus::Graduated),
        Just(StudentStatus::Suspended),
    ]
}

fn student_strategy() -> impl Strategy<Value = Student> {
    (
        (
            text_strategy(),
            text_strategy(),
            date_strategy(),
            gender_strategy(),
            text_strategy(),
            text_strategy(),
        ),
        (
            text_strategy(),
            text_strategy(),
            1u32..10,
            -10.0f64..10.0,
            status_strategy(),
        ),
    )
        .prop_map(
            |(
                (student_id, name, date_of_birth, gender, address, phone_number),
                (email, major, year_of_study, gpa, status),
            )| Student {
                id: String::new(),
                student_id,
                name,
                date_of_birth,
                gender,
                address,
                phone_number,
                email,
                major,
                year_of_study,
                gpa,
                status,
            },
        )
}

fn certificate_strategy(student_id: &'static str) -> impl Strategy<Value = Certificate> {
    (
        text_strategy(),
        text_strategy(),
        date_strategy(),
        proptest::option::of(date_strategy()),
        text_strategy(),
        text_strategy(),
    )
        .prop_map(
            move |(name, issuing_organization, issue_date, expiry_date, certificate_url, description)| {
                Certificate {
                    id: String::new(),
                    student_id: student_id.to_string(),
                    name,
                    issuing_organization,
                    issue_date,
                    expiry_date,
                    certificate_url,
                    description,
                }
            },
        )
}

fn valid_student_line(student_id: &str) -> String {
    format!(
        "{},Name {},2001-02-03,MALE,,,,IT,2,3.0,ACTIVE",
        student_id, student_id
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property 1: Student round trip
    // Serializing students and parsing the text back yields the same
    // records, field for field and in the same order.
    #[test]
    fn property_1_student_round_trip(
        students in prop::collection::vec(student_strategy(), 0..8)
    ) {
        let csv = serialize_students(&students).unwrap();
        let parsed = parse_students(&csv);
        prop_assert_eq!(parsed, students);
    }

    // Property 2: Certificate round trip
    // Parsing with the same student id recovers every certificate,
    // including absent expiry dates.
    #[test]
    fn property_2_certificate_round_trip(
        certificates in prop::collection::vec(certificate_strategy("52100001"), 0..8)
    ) {
        let csv = serialize_certificates(&certificates).unwrap();
        let parsed = parse_certificates("52100001", &csv);
        prop_assert_eq!(parsed, certificates);
    }

    // Property 3: Header always present
    // The first line of any export is the schema header, and the export has
    // exactly one line per record after it.
    #[test]
    fn property_3_header_and_line_count(
        students in prop::collection::vec(student_strategy(), 0..8)
    ) {
        let csv = serialize_students(&students).unwrap();
        let header = STUDENT_HEADER.join(",");
        prop_assert!(csv.ends_with('\n'));

        let lines: Vec<&str> = csv.lines().collect();
        prop_assert_eq!(lines[0], header.as_str());
        prop_assert_eq!(lines.len(), students.len() + 1);
    }

    // Property 4: Escaping
    // A value with commas or quotes is one field after splitting the
    // exported line.
    #[test]
    fn property_4_escaped_field_splits_back(
        left in "[a-z]{1,5}",
        right in "[a-z]{1,5}",
        use_quote in any::<bool>()
    ) {
        let separator = if use_quote { "\"" } else { ", " };
        let value = format!("{}{}{}", left, separator, right);

        let certificate = Certificate {
            id: String::new(),
            student_id: "S1".to_string(),
            name: value.clone(),
            issuing_organization: String::new(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            certificate_url: String::new(),
            description: String::new(),
        };
        let csv = serialize_certificates(&[certificate]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        let fields = split_row(row).unwrap();
        prop_assert_eq!(fields.len(), CERTIFICATE_HEADER.len());
        prop_assert_eq!(&fields[1], &value);
    }

    // Property 5: Bad-row tolerance
    // A row with an unterminated quote is dropped while every other row is
    // kept in order.
    #[test]
    fn property_5_bad_row_is_skipped(
        count in 1usize..10,
        bad_index in 0usize..10
    ) {
        let bad_index = bad_index % (count + 1);
        let mut lines = vec![STUDENT_HEADER.join(",")];
        let mut expected = Vec::new();
        for i in 0..count {
            if i == bad_index {
                lines.push("BAD,\"never closed,2001-02-03".to_string());
            }
            let id = format!("S{}", i);
            lines.push(valid_student_line(&id));
            expected.push(id);
        }
        if bad_index == count {
            lines.push("BAD,\"never closed,2001-02-03".to_string());
        }

        let report = parse_students_report(&lines.join("\n"));
        let ids: Vec<String> = report.records.into_iter().map(|s| s.student_id).collect();
        prop_assert_eq!(ids, expected);
        prop_assert_eq!(report.skipped.len(), 1);
        prop_assert_eq!(report.skipped[0].line_number, bad_index as u64 + 2);
    }

    // Property 6: Empty input
    // Text with no data rows, whatever its header or blank lines, parses to
    // an empty list.
    #[test]
    fn property_6_header_only_is_empty(
        header in "[a-zA-Z,]{0,40}",
        blank_lines in 0usize..4
    ) {
        let text = format!("{}{}", "\n".repeat(blank_lines), header);
        prop_assert!(parse_students(&text).is_empty());
        prop_assert!(parse_certificates("S1", &text).is_empty());
    }

    // Property 7: Enum defaults
    // Unrecognised gender and status values fall back to OTHER and ACTIVE.
    #[test]
    fn property_7_unknown_enums_default(
        gender in "[q-z]{3,8}",
        status in "[q-z]{3,8}"
    ) {
        let text = format!(
            "{}\nS1,An,2001-02-03,{},,,,IT,2,3.0,{}",
            STUDENT_HEADER.join(","),
            gender,
            status
        );
        let report = parse_students_report(&text);
        prop_assert_eq!(report.records[0].gender, Gender::Other);
        prop_assert_eq!(report.records[0].status, StudentStatus::Active);
        prop_assert_eq!(report.fallbacks.len(), 2);
    }

    // Property 8: Certificate owner override
    // Whatever the studentId column says, parsed certificates belong to the
    // student id passed in.
    #[test]
    fn property_8_certificate_owner_override(
        column_value in "[A-Z0-9]{0,8}",
        owner in "[A-Z][0-9]{3,8}"
    ) {
        let text = format!(
            "{}\n{},IELTS,BC,2023-05-01,,,",
            CERTIFICATE_HEADER.join(","),
            column_value
        );
        let parsed = parse_certificates(&owner, &text);
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0].student_id, &owner);
    }
}

#[test]
fn test_case_insensitive_enum_values() {
    let text = format!(
        "{}\nS1,An,2001-02-03,fEmAlE,,,,IT,2,3.0,graduated",
        STUDENT_HEADER.join(",")
    );
    let students = parse_students(&text);
    assert_eq!(students[0].gender, Gender::Female);
    assert_eq!(students[0].status, StudentStatus::Graduated);
}

#[test]
fn test_blank_expiry_round_trips_as_none() {
    let text = format!(
        "{}\nS1,IELTS,BC,2023-05-01,,,\n",
        CERTIFICATE_HEADER.join(",")
    );
    let certificates = parse_certificates("S1", &text);
    assert_eq!(certificates[0].expiry_date, None);

    let csv = serialize_certificates(&certificates).unwrap();
    assert_eq!(csv, text);
}
