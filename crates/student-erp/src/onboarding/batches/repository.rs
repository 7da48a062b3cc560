use super::domain::{BatchId, BatchKey, BatchRecord};
use crate::onboarding::profile::SectionVisibility;

/// Storage abstraction for batches.
///
/// Implementations must enforce uniqueness of [`BatchKey`] inside `insert_unique`: the check and
/// the write happen atomically (an `INSERT .. ON CONFLICT DO NOTHING`, a unique index, or a lock
/// held across both), and a losing writer receives [`RepositoryError::Conflict`].
pub trait BatchRepository: Send + Sync {
    fn find_by_key(&self, key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError>;
    fn insert_unique(&self, record: BatchRecord) -> Result<BatchRecord, RepositoryError>;
    fn fetch(&self, id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError>;
    fn set_visibility(
        &self,
        id: &BatchId,
        visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
