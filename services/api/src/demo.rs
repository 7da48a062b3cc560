use crate::infra::in_memory_services;
use chrono::NaiveDate;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use student_erp::config::{AppConfig, OnboardingConfig};
use student_erp::error::AppError;
use student_erp::onboarding::batches::Program;
use student_erp::onboarding::profile::{
    CompletionReport, DocumentUpload, EducationDetails, FinancialDetails, PersonalDetails,
    ProfileSection, ProfileUpdate, SectionVisibility, StudentProfile, StudentRegistration,
    TravelDetails, WorkDetails,
};
use student_erp::onboarding::roster::{RosterImportSummary, RosterImporter};

#[derive(Args, Debug)]
pub(crate) struct CompletionArgs {
    /// JSON file holding the student profile
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Optional JSON file mapping section names to visibility flags
    #[arg(long)]
    pub(crate) visibility: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// CSV roster with Email, First Name, Last Name, Program, Intake Year columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_completion_report(args: CompletionArgs) -> Result<(), AppError> {
    let profile: StudentProfile = serde_json::from_str(&fs::read_to_string(&args.profile)?)?;
    let visibility = match args.visibility {
        Some(path) => {
            let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            Some(SectionVisibility::from_json(&raw))
        }
        None => None,
    };

    let report = CompletionReport::evaluate(&profile, visibility.as_ref());
    render_completion(&report);
    Ok(())
}

pub(crate) fn run_roster_import(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (students, _) = in_memory_services(config.onboarding);

    let entries = RosterImporter::from_path(&args.csv)?;
    println!("Importing {} roster rows from {}", entries.len(), args.csv.display());
    let summary = RosterImporter::register(&*students, entries)?;
    render_roster_summary(&summary);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let (students, batches) = in_memory_services(OnboardingConfig::default());

    println!("Student onboarding demo");
    let asha = students.register(StudentRegistration {
        email: "asha.rao@example.edu".to_string(),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        program: Program::Bs,
        intake_year: 2025,
    })?;
    let leo = students.register(StudentRegistration {
        email: "leo.park@example.edu".to_string(),
        first_name: "Leo".to_string(),
        last_name: "Park".to_string(),
        program: Program::Bs,
        intake_year: 2025,
    })?;
    println!(
        "- Registered {} and {} into batch {} (shared: {})",
        asha.email,
        leo.email,
        asha.batch_name,
        asha.batch_id == leo.batch_id
    );
    println!("  Initial completion: {:.2}%", asha.completion);

    let updated = students.update_profile(&asha.student_id, demo_profile_update())?;
    println!("- Profile sections saved -> {:.2}%", updated.completion);

    students.attach_document(&asha.student_id, demo_upload("MOTHER_INCOME_PROOF"))?;
    let with_documents =
        students.attach_document(&asha.student_id, demo_upload("PASSPORT_COPY"))?;
    println!(
        "- Income proof and passport copy attached -> {:.2}%",
        with_documents.completion
    );

    batches
        .update_visibility(
            &asha.batch_id,
            SectionVisibility::hiding(&[
                ProfileSection::CourseDetails,
                ProfileSection::University,
                ProfileSection::PostAdmission,
            ]),
        )
        .map_err(|err| AppError::Onboarding(err.into()))?;
    println!("- Batch {} hides post-offer sections", asha.batch_name);

    let report = students.completion_report(&asha.student_id)?;
    render_completion(&report);

    Ok(())
}

fn demo_profile_update() -> ProfileUpdate {
    ProfileUpdate {
        personal_details: Some(PersonalDetails {
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            phone: Some("+91 98000 00000".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(2006, 3, 14),
            gender: Some("Female".to_string()),
            nationality: Some("Indian".to_string()),
            ..PersonalDetails::default()
        }),
        education: Some(EducationDetails {
            school_name: Some("Delhi Public School".to_string()),
            school_grade: Some("A1".to_string()),
            high_school_name: Some("Delhi Public School".to_string()),
            high_school_grade: Some("A2".to_string()),
            ..EducationDetails::default()
        }),
        travel: Some(TravelDetails {
            travel_history: Vec::new(),
            visa_refused: Some(false),
        }),
        work: Some(WorkDetails {
            has_work_experience: Some(false),
            experiences: Vec::new(),
        }),
        financials: Some(FinancialDetails {
            employment_history: Some("Student, no prior employment".to_string()),
            mother_income_type: Some("Salaried".to_string()),
            father_income_type: Some("Business".to_string()),
            annual_family_income: Some(1_800_000),
        }),
        passport_photo: Some("uploads/asha/photo.jpg".to_string()),
    }
}

fn demo_upload(tag: &str) -> DocumentUpload {
    DocumentUpload {
        document_type: tag.to_string(),
        file_name: format!("{}.pdf", tag.to_lowercase()),
        storage_key: format!("uploads/asha/{}.pdf", tag.to_lowercase()),
    }
}

fn render_completion(report: &CompletionReport) {
    println!(
        "\nProfile completion: {:.2}% ({} of {} visible sections)",
        report.percentage, report.completed_sections, report.visible_sections
    );
    for status in &report.sections {
        let state = match (status.visible, status.completed) {
            (false, _) => "hidden",
            (true, true) => "complete",
            (true, false) => "outstanding",
        };
        println!("  - {}: {}", status.section.label(), state);
    }
}

fn render_roster_summary(summary: &RosterImportSummary) {
    println!("- Registered {} students", summary.registered);
    if !summary.duplicates.is_empty() {
        println!("- Skipped {} duplicate e-mails:", summary.duplicates.len());
        for email in &summary.duplicates {
            println!("    {email}");
        }
    }
    println!("Batch assignments:");
    for (batch, count) in &summary.batches {
        println!("  - {batch}: {count}");
    }
}
