use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::documents::{classify_document_type, DocumentCategory};
use crate::onboarding::batches::Program;

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub Uuid);

impl StudentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registration request submitted once per student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRegistration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub program: Program,
    pub intake_year: u16,
}

/// Onboarding profile snapshot, one record per section.
///
/// Course details, university and post-admission carry no applicant-fillable fields yet, so they
/// have no record here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub personal_details: PersonalDetails,
    pub education: EducationDetails,
    pub travel: TravelDetails,
    pub work: WorkDetails,
    pub financials: FinancialDetails,
    pub documents: DocumentSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationDetails {
    pub school_name: Option<String>,
    pub school_grade: Option<String>,
    pub high_school_name: Option<String>,
    pub high_school_grade: Option<String>,
    pub bachelor_institution: Option<String>,
    pub bachelor_grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelDetails {
    pub travel_history: Vec<TravelEntry>,
    /// `None` until the applicant answers; `Some(false)` is an answer.
    pub visa_refused: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEntry {
    pub country: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub departed_on: Option<NaiveDate>,
    #[serde(default)]
    pub returned_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkDetails {
    pub has_work_experience: Option<bool>,
    pub experiences: Vec<WorkExperience>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub employer: String,
    pub role: String,
    #[serde(default)]
    pub started_on: Option<NaiveDate>,
    #[serde(default)]
    pub ended_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialDetails {
    /// The applicant's own employment narrative.
    pub employment_history: Option<String>,
    pub mother_income_type: Option<String>,
    pub father_income_type: Option<String>,
    pub annual_family_income: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSection {
    /// Storage key of the passport photo.
    pub passport_photo: Option<String>,
    pub uploaded: Vec<StudentDocument>,
}

impl DocumentSection {
    pub fn has_category(&self, category: DocumentCategory) -> bool {
        self.uploaded
            .iter()
            .any(|document| document.category() == category)
    }
}

/// Metadata of an uploaded document; file contents live in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    pub file_name: String,
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
}

impl StudentDocument {
    pub fn category(&self) -> DocumentCategory {
        classify_document_type(&self.document_type)
    }
}

/// Inbound document metadata before the upload timestamp is stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    #[serde(rename = "type")]
    pub document_type: String,
    pub file_name: String,
    pub storage_key: String,
}

/// Partial profile write; sections that are present replace the stored section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub personal_details: Option<PersonalDetails>,
    pub education: Option<EducationDetails>,
    pub travel: Option<TravelDetails>,
    pub work: Option<WorkDetails>,
    pub financials: Option<FinancialDetails>,
    pub passport_photo: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply_to(self, profile: &mut StudentProfile) {
        if let Some(personal) = self.personal_details {
            profile.personal_details = personal;
        }
        if let Some(education) = self.education {
            profile.education = education;
        }
        if let Some(travel) = self.travel {
            profile.travel = travel;
        }
        if let Some(work) = self.work {
            profile.work = work;
        }
        if let Some(financials) = self.financials {
            profile.financials = financials;
        }
        if let Some(photo) = self.passport_photo {
            profile.documents.passport_photo = Some(photo);
        }
    }
}
