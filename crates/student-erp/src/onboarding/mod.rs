pub mod batches;
pub mod profile;
pub mod roster;

use std::sync::Arc;

use axum::Router;

use batches::{batch_router, BatchRepository, BatchResolutionService};
use profile::{student_router, StudentProfileService, StudentRepository};

/// Combined router for batch administration and student onboarding.
pub fn onboarding_router<S, B>(
    students: Arc<StudentProfileService<S, B>>,
    batches: Arc<BatchResolutionService<B>>,
) -> Router
where
    S: StudentRepository + 'static,
    B: BatchRepository + 'static,
{
    student_router(students).merge(batch_router(batches))
}
