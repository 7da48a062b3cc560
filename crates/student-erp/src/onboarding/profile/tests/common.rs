use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};

use crate::onboarding::batches::tests::common::{onboarding_config, MemoryBatchRepository};
use crate::onboarding::batches::{BatchResolutionService, Program, RepositoryError};
use crate::onboarding::profile::{
    DocumentSection, DocumentUpload, EducationDetails, FinancialDetails, PersonalDetails,
    StudentDocument, StudentId, StudentProfile, StudentProfileService, StudentRecord,
    StudentRegistration, StudentRepository, TravelDetails, TravelEntry, WorkDetails,
    WorkExperience,
};

pub(super) type TestService = StudentProfileService<MemoryStudentRepository, MemoryBatchRepository>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryStudentRepository>,
    Arc<BatchResolutionService<MemoryBatchRepository>>,
) {
    let students = Arc::new(MemoryStudentRepository::default());
    let batches = Arc::new(BatchResolutionService::new(
        Arc::new(MemoryBatchRepository::default()),
        onboarding_config(),
    ));
    let service = StudentProfileService::new(students.clone(), batches.clone());
    (service, students, batches)
}

pub(super) fn registration(email: &str) -> StudentRegistration {
    StudentRegistration {
        email: email.to_string(),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        program: Program::Bs,
        intake_year: 2025,
    }
}

pub(super) fn personal_details() -> PersonalDetails {
    PersonalDetails {
        first_name: Some("Asha".to_string()),
        last_name: Some("Rao".to_string()),
        phone: Some("+91 98450 12345".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2006, 4, 12),
        gender: Some("Female".to_string()),
        nationality: Some("Indian".to_string()),
        ..PersonalDetails::default()
    }
}

pub(super) fn education() -> EducationDetails {
    EducationDetails {
        school_name: Some("St. Mary's School".to_string()),
        school_grade: Some("92%".to_string()),
        high_school_name: Some("National Public School".to_string()),
        high_school_grade: Some("89%".to_string()),
        ..EducationDetails::default()
    }
}

pub(super) fn travel() -> TravelDetails {
    TravelDetails {
        travel_history: vec![TravelEntry {
            country: "Singapore".to_string(),
            purpose: Some("Tourism".to_string()),
            departed_on: NaiveDate::from_ymd_opt(2023, 5, 2),
            returned_on: NaiveDate::from_ymd_opt(2023, 5, 12),
        }],
        visa_refused: None,
    }
}

pub(super) fn work() -> WorkDetails {
    WorkDetails {
        has_work_experience: Some(true),
        experiences: vec![WorkExperience {
            employer: "Northwind Traders".to_string(),
            role: "Intern".to_string(),
            started_on: NaiveDate::from_ymd_opt(2024, 6, 1),
            ended_on: NaiveDate::from_ymd_opt(2024, 8, 31),
        }],
    }
}

pub(super) fn financials() -> FinancialDetails {
    FinancialDetails {
        employment_history: Some("Part-time tutor since 2023".to_string()),
        mother_income_type: Some("Salaried".to_string()),
        father_income_type: Some("Business".to_string()),
        annual_family_income: Some(1_800_000),
    }
}

pub(super) fn document(tag: &str) -> StudentDocument {
    StudentDocument {
        document_type: tag.to_string(),
        file_name: format!("{}.pdf", tag.to_ascii_lowercase()),
        storage_key: format!("uploads/asha/{}.pdf", tag.to_ascii_lowercase()),
        uploaded_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn upload(tag: &str) -> DocumentUpload {
    let document = document(tag);
    DocumentUpload {
        document_type: document.document_type,
        file_name: document.file_name,
        storage_key: document.storage_key,
    }
}

pub(super) fn documents() -> DocumentSection {
    DocumentSection {
        passport_photo: Some("uploads/asha/photo.jpg".to_string()),
        uploaded: vec![document("MOTHER_INCOME_PROOF"), document("PASSPORT")],
    }
}

/// Every applicant-fillable section complete.
pub(super) fn complete_profile() -> StudentProfile {
    StudentProfile {
        personal_details: personal_details(),
        education: education(),
        travel: travel(),
        work: work(),
        financials: financials(),
        documents: documents(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStudentRepository {
    records: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
}

impl MemoryStudentRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl StudentRepository for MemoryStudentRepository {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.student_id)
            || guard.values().any(|existing| existing.email == record.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.student_id, record.clone());
        Ok(record)
    }

    fn modify<F>(&self, id: &StudentId, change: F) -> Result<StudentRecord, RepositoryError>
    where
        F: FnOnce(&mut StudentRecord),
    {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|record| record.email == email).cloned())
    }
}
