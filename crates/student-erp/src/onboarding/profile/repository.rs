use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{StudentId, StudentProfile};
use crate::onboarding::batches::{BatchId, RepositoryError};

/// Repository record for a registered student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub email: String,
    pub batch_id: BatchId,
    pub profile: StudentProfile,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction for student profiles.
///
/// `insert` reports [`RepositoryError::Conflict`] when the id or the e-mail is already taken.
/// `modify` applies `change` to the stored record and writes it back as one atomic step, so
/// concurrent modifications of the same student never overwrite each other.
pub trait StudentRepository: Send + Sync {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, RepositoryError>;
    fn modify<F>(&self, id: &StudentId, change: F) -> Result<StudentRecord, RepositoryError>
    where
        F: FnOnce(&mut StudentRecord);
    fn fetch(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, RepositoryError>;
}
