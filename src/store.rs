//! Record store module
//!
//! The [`RecordStore`] trait is the persistence seam used by the import and
//! export layer. Two implementations are provided:
//!
//! - [`MemoryStore`]: keeps everything in process memory
//! - [`JsonFileStore`]: the same behaviour, persisted as one JSON document
//!
//! Ids are assigned by the store as `<collection>-<n>` from a per-store
//! counter; an id carried by an incoming record is replaced.
//!
//! # Example
//!
//! ```
//! use student_records::store::{MemoryStore, RecordStore};
//!
//! let store = MemoryStore::new();
//! assert!(store.list_students().unwrap().is_empty());
//! ```

use std::cmp::Ordering;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::RecordsError;
use crate::model::{Certificate, Student, StudentStatus};

/// Collection name for students.
pub const STUDENTS_COLLECTION: &str = "students";
/// Collection name for certificates.
pub const CERTIFICATES_COLLECTION: &str = "certificates";

/// Criteria for [`RecordStore::search_students`].
///
/// Every criterion that is set must match. The default filter matches every
/// student.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StudentFilter {
    /// Case-sensitive prefix of the student's name.
    pub name_prefix: Option<String>,
    /// Exact major.
    pub major: Option<String>,
    /// Exact year of study.
    pub year_of_study: Option<u32>,
    /// Exact status.
    pub status: Option<StudentStatus>,
}

impl StudentFilter {
    /// Returns true if `student` satisfies every criterion that is set.
    pub fn matches(&self, student: &Student) -> bool {
        self.name_prefix
            .as_deref()
            .map_or(true, |prefix| student.name.starts_with(prefix))
            && self.major.as_deref().map_or(true, |major| student.major == major)
            && self.year_of_study.map_or(true, |year| student.year_of_study == year)
            && self.status.map_or(true, |status| student.status == status)
    }
}

/// Student field to order by in [`RecordStore::sort_students`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentSortField {
    StudentId,
    Name,
    DateOfBirth,
    Major,
    YearOfStudy,
    Gpa,
    Status,
}

impl StudentSortField {
    /// Ascending comparison of two students on this field.
    ///
    /// Strings compare byte-wise, GPA uses [`f64::total_cmp`] and status
    /// compares by its upper-case name.
    pub fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self {
            StudentSortField::StudentId => a.student_id.cmp(&b.student_id),
            StudentSortField::Name => a.name.cmp(&b.name),
            StudentSortField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
            StudentSortField::Major => a.major.cmp(&b.major),
            StudentSortField::YearOfStudy => a.year_of_study.cmp(&b.year_of_study),
            StudentSortField::Gpa => a.gpa.total_cmp(&b.gpa),
            StudentSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

/// Persistence operations over student and certificate records.
pub trait RecordStore {
    /// Stores a new student and returns its assigned id.
    fn create_student(&mut self, student: Student) -> Result<String, RecordsError>;

    /// Looks up a student by store id.
    fn get_student(&self, id: &str) -> Result<Option<Student>, RecordsError>;

    /// Lists all students in insertion order.
    fn list_students(&self) -> Result<Vec<Student>, RecordsError>;

    /// Replaces the student stored under `id`.
    ///
    /// Fails with [`RecordsError::Store`] when no such student exists.
    fn update_student(&mut self, id: &str, student: Student) -> Result<(), RecordsError>;

    /// Removes a student. Returns false if it did not exist.
    fn delete_student(&mut self, id: &str) -> Result<bool, RecordsError>;

    /// Lists the students matching `filter`, in insertion order.
    fn search_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, RecordsError> {
        let mut students = self.list_students()?;
        students.retain(|student| filter.matches(student));
        Ok(students)
    }

    /// Lists all students ordered by `field`. Ties keep insertion order.
    fn sort_students(
        &self,
        field: StudentSortField,
        ascending: bool,
    ) -> Result<Vec<Student>, RecordsError> {
        let mut students = self.list_students()?;
        students.sort_by(|a, b| {
            let ordering = field.compare(a, b);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        Ok(students)
    }

    /// Stores a new certificate and returns its assigned id.
    fn create_certificate(&mut self, certificate: Certificate) -> Result<String, RecordsError>;

    /// Replaces the certificate stored under `id`.
    ///
    /// Fails with [`RecordsError::Store`] when no such certificate exists.
    fn update_certificate(&mut self, id: &str, certificate: Certificate)
        -> Result<(), RecordsError>;

    /// Lists the certificates of one student, most recently issued first.
    fn certificates_for_student(&self, student_id: &str)
        -> Result<Vec<Certificate>, RecordsError>;

    /// Removes a certificate. Returns false if it did not exist.
    fn delete_certificate(&mut self, id: &str) -> Result<bool, RecordsError>;
}

/// Serializable contents shared by both store implementations.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct StoreData {
    next_id: u64,
    students: Vec<Student>,
    certificates: Vec<Certificate>,
}

impl StoreData {
    fn allocate_id(&mut self, collection: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", collection, self.next_id)
    }

    fn create_student(&mut self, mut student: Student) -> String {
        let id = self.allocate_id(STUDENTS_COLLECTION);
        student.id = id.clone();
        self.students.push(student);
        id
    }

    fn get_student(&self, id: &str) -> Option<Student> {
        self.students.iter().find(|s| s.id == id).cloned()
    }

    fn update_student(&mut self, id: &str, mut student: Student) -> Result<(), RecordsError> {
        let slot = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RecordsError::Store(format!("student not found: {}", id)))?;
        student.id = id.to_string();
        *slot = student;
        Ok(())
    }

    fn delete_student(&mut self, id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        self.students.len() != before
    }

    fn create_certificate(&mut self, mut certificate: Certificate) -> String {
        let id = self.allocate_id(CERTIFICATES_COLLECTION);
        certificate.id = id.clone();
        self.certificates.push(certificate);
        id
    }

    fn update_certificate(
        &mut self,
        id: &str,
        mut certificate: Certificate,
    ) -> Result<(), RecordsError> {
        let slot = self
            .certificates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RecordsError::Store(format!("certificate not found: {}", id)))?;
        certificate.id = id.to_string();
        *slot = certificate;
        Ok(())
    }

    fn certificates_for_student(&self, student_id: &str) -> Vec<Certificate> {
        let mut certificates: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal issue dates
        certificates.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        certificates
    }

    fn delete_certificate(&mut self, id: &str) -> bool {
        let before = self.certificates.len();
        self.certificates.retain(|c| c.id != id);
        self.certificates.len() != before
    }
}

/// In-memory record store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn create_student(&mut self, student: Student) -> Result<String, RecordsError> {
        Ok(self.data.create_student(student))
    }

    fn get_student(&self, id: &str) -> Result<Option<Student>, RecordsError> {
        Ok(self.data.get_student(id))
    }

    fn list_students(&self) -> Result<Vec<Student>, RecordsError> {
        Ok(self.data.students.clone())
    }

    fn update_student(&mut self, id: &str, student: Student) -> Result<(), RecordsError> {
        self.data.update_student(id, student)
    }

    fn delete_student(&mut self, id: &str) -> Result<bool, RecordsError> {
        Ok(self.data.delete_student(id))
    }

    fn create_certificate(&mut self, certificate: Certificate) -> Result<String, RecordsError> {
        Ok(self.data.create_certificate(certificate))
    }

    fn update_certificate(
        &mut self,
        id: &str,
        certificate: Certificate,
    ) -> Result<(), RecordsError> {
        self.data.update_certificate(id, certificate)
    }

    fn certificates_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<Certificate>, RecordsError> {
        Ok(self.data.certificates_for_student(student_id))
    }

    fn delete_certificate(&mut self, id: &str) -> Result<bool, RecordsError> {
        Ok(self.data.delete_certificate(id))
    }
}

/// Record store persisted as a single JSON file.
///
/// Mutations apply in memory; call [`JsonFileStore::flush`] to write them
/// out. The file is replaced atomically: the document is written and synced
/// to a uniquely named temporary file in the same directory, which is then
/// renamed over the target.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file opens as an empty store.
    pub fn open(path: &Path) -> Result<Self, RecordsError> {
        let data = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {:?} not found, starting empty", path);
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes pending changes to disk. Does nothing when nothing changed.
    pub fn flush(&mut self) -> Result<(), RecordsError> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_vec_pretty(&self.data)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropping the temp file on any error below removes it
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        self.dirty = false;

        info!(
            "Saved {} students and {} certificates to {:?}",
            self.data.students.len(),
            self.data.certificates.len(),
            self.path
        );
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn create_student(&mut self, student: Student) -> Result<String, RecordsError> {
        self.dirty = true;
        Ok(self.data.create_student(student))
    }

    fn get_student(&self, id: &str) -> Result<Option<Student>, RecordsError> {
        Ok(self.data.get_student(id))
    }

    fn list_students(&self) -> Result<Vec<Student>, RecordsError> {
        Ok(self.data.students.clone())
    }

    fn update_student(&mut self, id: &str, student: Student) -> Result<(), RecordsError> {
        self.data.update_student(id, student)?;
        self.dirty = true;
        Ok(())
    }

    fn delete_student(&mut self, id: &str) -> Result<bool, RecordsError> {
        let removed = self.data.delete_student(id);
        self.dirty |= removed;
        Ok(removed)
    }

    fn create_certificate(&mut self, certificate: Certificate) -> Result<String, RecordsError> {
        self.dirty = true;
        Ok(self.data.create_certificate(certificate))
    }

    fn update_certificate(
        &mut self,
        id: &str,
        certificate: Certificate,
    ) -> Result<(), RecordsError> {
        self.data.update_certificate(id, certificate)?;
        self.dirty = true;
        Ok(())
    }

    fn certificates_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<Certificate>, RecordsError> {
        Ok(self.data.certificates_for_student(student_id))
    }

    fn delete_certificate(&mut self, id: &str) -> Result<bool, RecordsError> {
        let removed = self.data.delete_certificate(id);
        self.dirty |= removed;
        Ok(removed)
    }
}
