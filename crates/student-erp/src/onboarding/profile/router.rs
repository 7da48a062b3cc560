use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use uuid::Uuid;

use super::domain::{DocumentUpload, ProfileUpdate, StudentId, StudentRegistration};
use super::repository::StudentRepository;
use super::service::{StudentProfileService, StudentServiceError};
use crate::onboarding::batches::{BatchRepository, BatchServiceError, RepositoryError};

/// Router builder exposing registration and profile endpoints.
pub fn student_router<S, B>(service: Arc<StudentProfileService<S, B>>) -> Router
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    Router::new()
        .route("/api/v1/students", post(register_handler::<S, B>))
        .route("/api/v1/students/:student_id", get(profile_handler::<S, B>))
        .route(
            "/api/v1/students/:student_id/profile",
            put(update_handler::<S, B>),
        )
        .route(
            "/api/v1/students/:student_id/documents",
            post(document_handler::<S, B>),
        )
        .route(
            "/api/v1/students/:student_id/completion",
            get(completion_handler::<S, B>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<S, B>(
    State(service): State<Arc<StudentProfileService<S, B>>>,
    axum::Json(registration): axum::Json<StudentRegistration>,
) -> Response
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    match service.register(registration) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<S, B>(
    State(service): State<Arc<StudentProfileService<S, B>>>,
    Path(student_id): Path<Uuid>,
) -> Response
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    match service.get(&StudentId(student_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<S, B>(
    State(service): State<Arc<StudentProfileService<S, B>>>,
    Path(student_id): Path<Uuid>,
    axum::Json(update): axum::Json<ProfileUpdate>,
) -> Response
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    match service.update_profile(&StudentId(student_id), update) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn document_handler<S, B>(
    State(service): State<Arc<StudentProfileService<S, B>>>,
    Path(student_id): Path<Uuid>,
    axum::Json(upload): axum::Json<DocumentUpload>,
) -> Response
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    match service.attach_document(&StudentId(student_id), upload) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn completion_handler<S, B>(
    State(service): State<Arc<StudentProfileService<S, B>>>,
    Path(student_id): Path<Uuid>,
) -> Response
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    match service.completion_report(&StudentId(student_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &StudentServiceError) -> StatusCode {
    match error {
        StudentServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StudentServiceError::DuplicateEmail(_)
        | StudentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        StudentServiceError::NotFound(_)
        | StudentServiceError::Batch(BatchServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
        StudentServiceError::Batch(_) | StudentServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: StudentServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}
