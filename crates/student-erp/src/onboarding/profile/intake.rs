use chrono::{NaiveDate, Utc};

use super::domain::{
    DocumentUpload, EducationDetails, FinancialDetails, PersonalDetails, ProfileUpdate,
    StudentRegistration, TravelDetails, WorkDetails,
};

pub const MIN_INTAKE_YEAR: u16 = 2000;
pub const MAX_INTAKE_YEAR: u16 = 2100;

/// Validation errors raised before data reaches the store or the completion rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("'{0}' is not a valid e-mail address")]
    InvalidEmail(String),
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error(
        "intake year {year} outside supported range {}-{}",
        MIN_INTAKE_YEAR,
        MAX_INTAKE_YEAR
    )]
    IntakeYearOutOfRange { year: u16 },
    #[error("date of birth {0} lies in the future")]
    FutureDateOfBirth(NaiveDate),
    #[error("work experience at {employer} ends before it starts")]
    InvertedWorkExperience { employer: String },
    #[error("profile update contained no sections")]
    EmptyUpdate,
}

/// Boundary guard that tidies inbound payloads into the shape the completion rules expect:
/// trimmed text, and blank strings collapsed to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileIntake;

impl ProfileIntake {
    pub fn registration(
        &self,
        registration: StudentRegistration,
    ) -> Result<StudentRegistration, IntakeViolation> {
        let email = registration.email.trim().to_ascii_lowercase();
        if !is_plausible_email(&email) {
            return Err(IntakeViolation::InvalidEmail(registration.email));
        }

        let first_name = required(registration.first_name, "first_name")?;
        let last_name = required(registration.last_name, "last_name")?;

        let intake_year = self.intake_year(registration.intake_year)?;

        Ok(StudentRegistration {
            email,
            first_name,
            last_name,
            program: registration.program,
            intake_year,
        })
    }

    pub fn intake_year(&self, year: u16) -> Result<u16, IntakeViolation> {
        if (MIN_INTAKE_YEAR..=MAX_INTAKE_YEAR).contains(&year) {
            Ok(year)
        } else {
            Err(IntakeViolation::IntakeYearOutOfRange { year })
        }
    }

    pub fn update(&self, update: ProfileUpdate) -> Result<ProfileUpdate, IntakeViolation> {
        if update.is_empty() {
            return Err(IntakeViolation::EmptyUpdate);
        }

        let ProfileUpdate {
            personal_details,
            education,
            travel,
            work,
            financials,
            passport_photo,
        } = update;

        Ok(ProfileUpdate {
            personal_details: personal_details.map(tidy_personal).transpose()?,
            education: education.map(tidy_education),
            travel: travel.map(tidy_travel),
            work: work.map(tidy_work).transpose()?,
            financials: financials.map(tidy_financials),
            passport_photo: tidied(passport_photo),
        })
    }

    pub fn document(&self, upload: DocumentUpload) -> Result<DocumentUpload, IntakeViolation> {
        Ok(DocumentUpload {
            document_type: required(upload.document_type, "type")?.to_ascii_uppercase(),
            file_name: required(upload.file_name, "file_name")?,
            storage_key: required(upload.storage_key, "storage_key")?,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

fn required(value: String, field: &'static str) -> Result<String, IntakeViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(IntakeViolation::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn tidied(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn tidy_personal(personal: PersonalDetails) -> Result<PersonalDetails, IntakeViolation> {
    if let Some(date_of_birth) = personal.date_of_birth {
        if date_of_birth > Utc::now().date_naive() {
            return Err(IntakeViolation::FutureDateOfBirth(date_of_birth));
        }
    }

    Ok(PersonalDetails {
        first_name: tidied(personal.first_name),
        middle_name: tidied(personal.middle_name),
        last_name: tidied(personal.last_name),
        phone: tidied(personal.phone),
        date_of_birth: personal.date_of_birth,
        gender: tidied(personal.gender),
        nationality: tidied(personal.nationality),
        passport_number: tidied(personal.passport_number),
        address: tidied(personal.address),
    })
}

fn tidy_education(education: EducationDetails) -> EducationDetails {
    EducationDetails {
        school_name: tidied(education.school_name),
        school_grade: tidied(education.school_grade),
        high_school_name: tidied(education.high_school_name),
        high_school_grade: tidied(education.high_school_grade),
        bachelor_institution: tidied(education.bachelor_institution),
        bachelor_grade: tidied(education.bachelor_grade),
    }
}

fn tidy_travel(mut travel: TravelDetails) -> TravelDetails {
    travel
        .travel_history
        .retain(|entry| !entry.country.trim().is_empty());
    for entry in &mut travel.travel_history {
        entry.country = entry.country.trim().to_string();
        entry.purpose = tidied(entry.purpose.take());
    }
    travel
}

fn tidy_work(mut work: WorkDetails) -> Result<WorkDetails, IntakeViolation> {
    work.experiences
        .retain(|experience| !experience.employer.trim().is_empty());
    for experience in &mut work.experiences {
        experience.employer = experience.employer.trim().to_string();
        experience.role = experience.role.trim().to_string();
        if let (Some(started), Some(ended)) = (experience.started_on, experience.ended_on) {
            if ended < started {
                return Err(IntakeViolation::InvertedWorkExperience {
                    employer: experience.employer.clone(),
                });
            }
        }
    }
    Ok(work)
}

fn tidy_financials(financials: FinancialDetails) -> FinancialDetails {
    FinancialDetails {
        employment_history: tidied(financials.employment_history),
        mother_income_type: tidied(financials.mother_income_type),
        father_income_type: tidied(financials.father_income_type),
        annual_family_income: financials.annual_family_income,
    }
}
