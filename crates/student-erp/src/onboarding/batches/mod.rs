//! Batch assignment: one cohort per (program, intake year), created lazily on first registration.

pub mod domain;
mod naming;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{BatchId, BatchKey, BatchRecord, BatchView, Program, UnknownProgram};
pub use naming::batch_name;
pub use repository::{BatchRepository, RepositoryError};
pub use router::batch_router;
pub use service::{BatchResolutionService, BatchServiceError};
