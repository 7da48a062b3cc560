use super::super::documents::DocumentCategory;
use super::super::domain::{
    DocumentSection, EducationDetails, FinancialDetails, PersonalDetails, StudentProfile,
    TravelDetails, WorkDetails,
};
use super::super::visibility::ProfileSection;

pub(crate) fn section_completed(profile: &StudentProfile, section: ProfileSection) -> bool {
    match section {
        ProfileSection::PersonalDetails => personal_details_complete(&profile.personal_details),
        ProfileSection::Education => education_complete(&profile.education),
        ProfileSection::Travel => travel_complete(&profile.travel),
        ProfileSection::WorkDetails => work_details_complete(&profile.work),
        ProfileSection::Financials => {
            financials_complete(&profile.financials, &profile.documents)
        }
        ProfileSection::Documents => documents_complete(&profile.documents),
        // No applicant-fillable fields exist for these yet.
        ProfileSection::CourseDetails
        | ProfileSection::University
        | ProfileSection::PostAdmission => false,
    }
}

fn filled(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

fn personal_details_complete(personal: &PersonalDetails) -> bool {
    filled(&personal.first_name)
        && filled(&personal.last_name)
        && filled(&personal.phone)
        && personal.date_of_birth.is_some()
        && filled(&personal.gender)
        && filled(&personal.nationality)
}

fn education_complete(education: &EducationDetails) -> bool {
    filled(&education.school_name)
        && filled(&education.school_grade)
        && filled(&education.high_school_name)
        && filled(&education.high_school_grade)
}

fn travel_complete(travel: &TravelDetails) -> bool {
    !travel.travel_history.is_empty() || travel.visa_refused.is_some()
}

fn work_details_complete(work: &WorkDetails) -> bool {
    match work.has_work_experience {
        Some(false) => true,
        Some(true) => !work.experiences.is_empty(),
        None => false,
    }
}

fn financials_complete(financials: &FinancialDetails, documents: &DocumentSection) -> bool {
    filled(&financials.employment_history)
        && filled(&financials.mother_income_type)
        && filled(&financials.father_income_type)
        && documents.has_category(DocumentCategory::Financial)
}

fn documents_complete(documents: &DocumentSection) -> bool {
    filled(&documents.passport_photo) && documents.has_category(DocumentCategory::General)
}
