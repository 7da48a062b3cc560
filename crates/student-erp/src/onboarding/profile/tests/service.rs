use super::common::*;
use crate::onboarding::batches::{BatchId, BatchServiceError, Program};
use crate::onboarding::profile::{
    IntakeViolation, ProfileSection, ProfileUpdate, SectionVisibility, StudentId,
    StudentRepository, StudentServiceError,
};
use std::sync::Barrier;
use std::thread;

#[test]
fn register_assigns_batch_and_prefills_names() {
    let (service, students, batches) = build_service();

    let view = service
        .register(registration("Asha.Rao@example.edu"))
        .expect("registration succeeds");

    assert_eq!(view.email, "asha.rao@example.edu");
    assert_eq!(view.batch_name, "BS-2025");
    assert_eq!(view.completion, 0.0);
    assert_eq!(
        view.profile.personal_details.first_name.as_deref(),
        Some("Asha")
    );
    assert_eq!(students.len(), 1);
    assert_eq!(
        batches
            .resolve(Program::Bs, 2025)
            .expect("batch already exists"),
        view.batch_id
    );
}

#[test]
fn cohort_members_share_a_batch() {
    let (service, _, batches) = build_service();

    let first = service
        .register(registration("asha@example.edu"))
        .expect("first registration");
    let second = service
        .register(registration("leo@example.edu"))
        .expect("second registration");
    let mut other = registration("mia@example.edu");
    other.program = Program::Bba;
    let third = service.register(other).expect("third registration");

    assert_eq!(first.batch_id, second.batch_id);
    assert_ne!(first.batch_id, third.batch_id);
    assert_eq!(batches.list().expect("list").len(), 2);
}

#[test]
fn duplicate_emails_are_rejected() {
    let (service, students, _) = build_service();
    service
        .register(registration("asha@example.edu"))
        .expect("first registration");

    match service.register(registration("ASHA@example.edu ")) {
        Err(StudentServiceError::DuplicateEmail(email)) => {
            assert_eq!(email, "asha@example.edu")
        }
        other => panic!("expected duplicate e-mail error, got {other:?}"),
    }
    assert_eq!(students.len(), 1);
}

#[test]
fn register_propagates_intake_violations() {
    let (service, students, batches) = build_service();
    let mut invalid = registration("asha@example.edu");
    invalid.intake_year = 2150;

    match service.register(invalid) {
        Err(StudentServiceError::Intake(IntakeViolation::IntakeYearOutOfRange { year })) => {
            assert_eq!(year, 2150)
        }
        other => panic!("expected intake violation, got {other:?}"),
    }
    assert_eq!(students.len(), 0);
    assert!(batches.list().expect("list").is_empty());
}

#[test]
fn updates_recompute_completion() {
    let (service, _, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");

    let updated = service
        .update_profile(
            &view.student_id,
            ProfileUpdate {
                personal_details: Some(personal_details()),
                education: Some(education()),
                ..ProfileUpdate::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.completion, 22.22);
    assert_eq!(
        service.get(&view.student_id).expect("fetch").completion,
        22.22
    );
}

#[test]
fn updates_leave_omitted_sections_untouched() {
    let (service, _, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");

    service
        .update_profile(
            &view.student_id,
            ProfileUpdate {
                education: Some(education()),
                ..ProfileUpdate::default()
            },
        )
        .expect("education update");
    let updated = service
        .update_profile(
            &view.student_id,
            ProfileUpdate {
                work: Some(work()),
                ..ProfileUpdate::default()
            },
        )
        .expect("work update");

    assert_eq!(updated.profile.education, education());
    assert_eq!(
        updated.profile.personal_details.last_name.as_deref(),
        Some("Rao")
    );
}

#[test]
fn batch_visibility_shapes_student_completion() {
    let (service, _, batches) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");

    service
        .update_profile(
            &view.student_id,
            ProfileUpdate {
                personal_details: Some(personal_details()),
                education: Some(education()),
                travel: Some(travel()),
                work: Some(work()),
                financials: Some(financials()),
                passport_photo: Some("uploads/asha/photo.jpg".to_string()),
            },
        )
        .expect("update");
    service
        .attach_document(&view.student_id, upload("MOTHER_INCOME_PROOF"))
        .expect("financial proof");
    let before = service
        .attach_document(&view.student_id, upload("RESUME"))
        .expect("general document");
    assert_eq!(before.completion, 66.67);

    batches
        .update_visibility(
            &view.batch_id,
            SectionVisibility::hiding(&[
                ProfileSection::CourseDetails,
                ProfileSection::University,
                ProfileSection::PostAdmission,
            ]),
        )
        .expect("visibility stored");

    assert_eq!(
        service.get(&view.student_id).expect("fetch").completion,
        100.0
    );
    let report = service
        .completion_report(&view.student_id)
        .expect("report");
    assert_eq!(report.visible_sections, 6);
    assert_eq!(report.outstanding().count(), 0);
}

#[test]
fn attach_document_stamps_metadata() {
    let (service, _, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");

    let mut lowercase = upload("PASSPORT");
    lowercase.document_type = "passport".to_string();
    let updated = service
        .attach_document(&view.student_id, lowercase)
        .expect("document attached");

    let stored = updated
        .profile
        .documents
        .uploaded
        .first()
        .expect("document stored");
    assert_eq!(stored.document_type, "PASSPORT");
    assert_eq!(stored.file_name, "passport.pdf");
}

#[test]
fn unknown_students_are_not_found() {
    let (service, _, _) = build_service();
    let missing = StudentId::generate();

    match service.get(&missing) {
        Err(StudentServiceError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(matches!(
        service.update_profile(
            &missing,
            ProfileUpdate {
                education: Some(education()),
                ..ProfileUpdate::default()
            }
        ),
        Err(StudentServiceError::NotFound(_))
    ));
}

#[test]
fn orphaned_batches_surface_as_batch_errors() {
    let (service, students, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");

    students
        .modify(&view.student_id, |record| record.batch_id = BatchId::generate())
        .expect("batch reassigned");

    assert!(matches!(
        service.get(&view.student_id),
        Err(StudentServiceError::Batch(BatchServiceError::NotFound(_)))
    ));
}

#[test]
fn concurrent_uploads_for_one_student_are_all_kept() {
    const UPLOADERS: usize = 16;
    const ROUNDS: usize = 12;
    let (service, students, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");
    let barrier = Barrier::new(UPLOADERS);

    thread::scope(|scope| {
        for _ in 0..UPLOADERS {
            scope.spawn(|| {
                barrier.wait();
                for _ in 0..ROUNDS {
                    service
                        .attach_document(&view.student_id, upload("RESUME"))
                        .expect("upload stored");
                }
            });
        }
    });

    let stored = students
        .fetch(&view.student_id)
        .expect("fetch")
        .expect("record present");
    assert_eq!(stored.profile.documents.uploaded.len(), UPLOADERS * ROUNDS);
}

#[test]
fn concurrent_section_edits_do_not_drop_uploads() {
    let (service, students, _) = build_service();
    let view = service
        .register(registration("asha@example.edu"))
        .expect("registration");
    let barrier = Barrier::new(2);

    thread::scope(|scope| {
        scope.spawn(|| {
            barrier.wait();
            for _ in 0..50 {
                service
                    .attach_document(&view.student_id, upload("PASSPORT"))
                    .expect("upload stored");
            }
        });
        scope.spawn(|| {
            barrier.wait();
            for _ in 0..50 {
                service
                    .update_profile(
                        &view.student_id,
                        ProfileUpdate {
                            education: Some(education()),
                            ..ProfileUpdate::default()
                        },
                    )
                    .expect("edit stored");
            }
        });
    });

    let stored = students
        .fetch(&view.student_id)
        .expect("fetch")
        .expect("record present");
    assert_eq!(stored.profile.documents.uploaded.len(), 50);
    assert_eq!(stored.profile.education, education());
}
