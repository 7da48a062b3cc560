use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::domain::{BatchId, BatchView, Program};
use super::repository::BatchRepository;
use super::service::{BatchResolutionService, BatchServiceError};
use crate::onboarding::profile::{ProfileIntake, SectionVisibility};

/// Payload for explicit batch resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveBatchRequest {
    pub program: Program,
    pub intake_year: u16,
}

/// Router builder exposing batch administration endpoints.
pub fn batch_router<B>(service: Arc<BatchResolutionService<B>>) -> Router
where
    B: BatchRepository + 'static,
{
    Router::new()
        .route("/api/v1/batches", get(list_handler::<B>))
        .route("/api/v1/batches/resolve", post(resolve_handler::<B>))
        .route("/api/v1/batches/:batch_id", get(get_handler::<B>))
        .route(
            "/api/v1/batches/:batch_id/visibility",
            put(visibility_handler::<B>),
        )
        .with_state(service)
}

pub(crate) async fn resolve_handler<B>(
    State(service): State<Arc<BatchResolutionService<B>>>,
    axum::Json(request): axum::Json<ResolveBatchRequest>,
) -> Response
where
    B: BatchRepository + 'static,
{
    let intake_year = match ProfileIntake.intake_year(request.intake_year) {
        Ok(year) => year,
        Err(violation) => {
            let payload = json!({ "error": violation.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.resolve_record(request.program, intake_year) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<B>(
    State(service): State<Arc<BatchResolutionService<B>>>,
) -> Response
where
    B: BatchRepository + 'static,
{
    match service.list() {
        Ok(records) => {
            let views: Vec<BatchView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<B>(
    State(service): State<Arc<BatchResolutionService<B>>>,
    Path(batch_id): Path<Uuid>,
) -> Response
where
    B: BatchRepository + 'static,
{
    match service.get(&BatchId(batch_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn visibility_handler<B>(
    State(service): State<Arc<BatchResolutionService<B>>>,
    Path(batch_id): Path<Uuid>,
    axum::Json(visibility): axum::Json<SectionVisibility>,
) -> Response
where
    B: BatchRepository + 'static,
{
    match service.update_visibility(&BatchId(batch_id), visibility) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: BatchServiceError) -> Response {
    let status = match &error {
        BatchServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        BatchServiceError::Contention { .. } | BatchServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
