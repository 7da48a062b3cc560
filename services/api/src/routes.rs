use crate::infra::{AppState, InMemoryBatchRepository, OnboardingService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use student_erp::error::AppError;
use student_erp::onboarding::batches::BatchResolutionService;
use student_erp::onboarding::onboarding_router;
use student_erp::onboarding::profile::{CompletionReport, SectionVisibility, StudentProfile};
use student_erp::onboarding::roster::{RosterImportSummary, RosterImporter};

/// Ad-hoc scoring request; nothing is persisted.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionPreviewRequest {
    #[serde(default)]
    pub(crate) profile: StudentProfile,
    #[serde(default)]
    pub(crate) visibility: Option<SectionVisibility>,
}

pub(crate) fn with_service_routes(
    students: Arc<OnboardingService>,
    batches: Arc<BatchResolutionService<InMemoryBatchRepository>>,
) -> axum::Router {
    onboarding_router(students, batches)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/roster/import",
            axum::routing::post(roster_import_endpoint),
        )
        .route(
            "/api/v1/completion/preview",
            axum::routing::post(completion_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Registers a CSV roster posted as the raw request body.
pub(crate) async fn roster_import_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Json<RosterImportSummary>, AppError> {
    let entries = RosterImporter::from_reader(body.as_bytes())?;
    let summary = RosterImporter::register(&*state.students, entries)?;
    Ok(Json(summary))
}

pub(crate) async fn completion_preview_endpoint(
    Json(payload): Json<CompletionPreviewRequest>,
) -> Json<CompletionReport> {
    Json(CompletionReport::evaluate(
        &payload.profile,
        payload.visibility.as_ref(),
    ))
}
