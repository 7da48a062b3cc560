//! Student registration, profile maintenance, and completion scoring.

pub mod completion;
pub mod documents;
pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use completion::{compute_completion, CompletionReport, SectionStatus};
pub use documents::{classify_document_type, DocumentCategory};
pub use domain::{
    DocumentSection, DocumentUpload, EducationDetails, FinancialDetails, PersonalDetails,
    ProfileUpdate, StudentDocument, StudentId, StudentProfile, StudentRegistration, TravelDetails,
    TravelEntry, WorkDetails, WorkExperience,
};
pub use intake::{IntakeViolation, ProfileIntake};
pub use repository::{StudentRecord, StudentRepository};
pub use router::student_router;
pub use service::{StudentProfileService, StudentProfileView, StudentServiceError};
pub use visibility::{ProfileSection, SectionVisibility};
