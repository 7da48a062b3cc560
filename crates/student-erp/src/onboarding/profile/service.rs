use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::completion::CompletionReport;
use super::domain::{
    DocumentUpload, PersonalDetails, ProfileUpdate, StudentDocument, StudentId, StudentProfile,
    StudentRegistration,
};
use super::intake::{IntakeViolation, ProfileIntake};
use super::repository::{StudentRecord, StudentRepository};
use crate::onboarding::batches::{
    BatchId, BatchRecord, BatchRepository, BatchResolutionService, BatchServiceError,
    RepositoryError,
};

/// Profile payload returned on every read and write, with the completion attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfileView {
    pub student_id: StudentId,
    pub email: String,
    pub batch_id: BatchId,
    pub batch_name: String,
    pub completion: f64,
    pub profile: StudentProfile,
}

/// Service composing the intake guard, student store, and batch resolution.
pub struct StudentProfileService<S, B> {
    intake: ProfileIntake,
    students: Arc<S>,
    batches: Arc<BatchResolutionService<B>>,
}

impl<S, B> StudentProfileService<S, B>
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    pub fn new(students: Arc<S>, batches: Arc<BatchResolutionService<B>>) -> Self {
        Self {
            intake: ProfileIntake,
            students,
            batches,
        }
    }

    /// Register a student, assigning the batch for their program and intake year.
    pub fn register(
        &self,
        registration: StudentRegistration,
    ) -> Result<StudentProfileView, StudentServiceError> {
        let registration = self.intake.registration(registration)?;

        if self.students.find_by_email(&registration.email)?.is_some() {
            return Err(StudentServiceError::DuplicateEmail(registration.email));
        }

        let batch = self
            .batches
            .resolve_record(registration.program, registration.intake_year)?;

        let email = registration.email.clone();
        let now = Utc::now();
        let record = StudentRecord {
            student_id: StudentId::generate(),
            email: registration.email,
            batch_id: batch.id,
            profile: StudentProfile {
                personal_details: PersonalDetails {
                    first_name: Some(registration.first_name),
                    last_name: Some(registration.last_name),
                    ..PersonalDetails::default()
                },
                ..StudentProfile::default()
            },
            registered_at: now,
            updated_at: now,
        };

        let stored = match self.students.insert(record) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(StudentServiceError::DuplicateEmail(email));
            }
            Err(other) => return Err(other.into()),
        };

        info!(student_id = %stored.student_id, batch = %batch.name, "student registered");
        Ok(self.view(&stored, &batch))
    }

    pub fn get(&self, student_id: &StudentId) -> Result<StudentProfileView, StudentServiceError> {
        let record = self.record(student_id)?;
        let batch = self.batches.get(&record.batch_id)?;
        Ok(self.view(&record, &batch))
    }

    /// Merge the provided sections into the stored profile.
    pub fn update_profile(
        &self,
        student_id: &StudentId,
        update: ProfileUpdate,
    ) -> Result<StudentProfileView, StudentServiceError> {
        let update = self.intake.update(update)?;
        let record = self.modify(student_id, |record| {
            update.apply_to(&mut record.profile);
            record.updated_at = Utc::now();
        })?;

        let batch = self.batches.get(&record.batch_id)?;
        Ok(self.view(&record, &batch))
    }

    /// Append document metadata; the file itself is already in external storage.
    pub fn attach_document(
        &self,
        student_id: &StudentId,
        upload: DocumentUpload,
    ) -> Result<StudentProfileView, StudentServiceError> {
        let upload = self.intake.document(upload)?;
        let now = Utc::now();
        let document = StudentDocument {
            document_type: upload.document_type,
            file_name: upload.file_name,
            storage_key: upload.storage_key,
            uploaded_at: now,
        };
        let record = self.modify(student_id, |record| {
            record.profile.documents.uploaded.push(document);
            record.updated_at = now;
        })?;

        let batch = self.batches.get(&record.batch_id)?;
        Ok(self.view(&record, &batch))
    }

    /// Per-section completion for the student under their batch's visibility.
    pub fn completion_report(
        &self,
        student_id: &StudentId,
    ) -> Result<CompletionReport, StudentServiceError> {
        let record = self.record(student_id)?;
        let batch = self.batches.get(&record.batch_id)?;
        Ok(CompletionReport::evaluate(
            &record.profile,
            batch.visibility.as_ref(),
        ))
    }

    fn modify<F>(
        &self,
        student_id: &StudentId,
        change: F,
    ) -> Result<StudentRecord, StudentServiceError>
    where
        F: FnOnce(&mut StudentRecord),
    {
        match self.students.modify(student_id, change) {
            Ok(record) => Ok(record),
            Err(RepositoryError::NotFound) => Err(StudentServiceError::NotFound(*student_id)),
            Err(other) => Err(other.into()),
        }
    }

    fn record(&self, student_id: &StudentId) -> Result<StudentRecord, StudentServiceError> {
        self.students
            .fetch(student_id)?
            .ok_or(StudentServiceError::NotFound(*student_id))
    }

    fn view(&self, record: &StudentRecord, batch: &BatchRecord) -> StudentProfileView {
        let report = CompletionReport::evaluate(&record.profile, batch.visibility.as_ref());
        StudentProfileView {
            student_id: record.student_id,
            email: record.email.clone(),
            batch_id: batch.id,
            batch_name: batch.name.clone(),
            completion: report.percentage,
            profile: record.profile.clone(),
        }
    }
}

/// Error raised by the student profile service.
#[derive(Debug, thiserror::Error)]
pub enum StudentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("a student is already registered with e-mail {0}")]
    DuplicateEmail(String),
    #[error("student {0} not found")]
    NotFound(StudentId),
    #[error(transparent)]
    Batch(#[from] BatchServiceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
