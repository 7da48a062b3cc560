use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{BatchId, BatchKey, BatchRecord, Program};
use super::repository::{BatchRepository, RepositoryError};
use crate::config::OnboardingConfig;
use crate::onboarding::profile::SectionVisibility;

/// Find-or-create resolution of batches plus the administrative reads around them.
pub struct BatchResolutionService<B> {
    repository: Arc<B>,
    max_attempts: u8,
}

impl<B> BatchResolutionService<B>
where
    B: BatchRepository + 'static,
{
    pub fn new(repository: Arc<B>, config: OnboardingConfig) -> Self {
        Self {
            repository,
            max_attempts: config.batch_resolve_attempts.max(1),
        }
    }

    /// Batch id for `(program, intake_year)`, creating the batch on first use.
    pub fn resolve(&self, program: Program, intake_year: u16) -> Result<BatchId, BatchServiceError> {
        self.resolve_record(program, intake_year)
            .map(|record| record.id)
    }

    /// Same as [`resolve`](Self::resolve) but returns the whole record.
    ///
    /// A conflicting insert means a concurrent caller created the row first; the lookup is
    /// retried so the caller observes the winner's record instead of the constraint error.
    pub fn resolve_record(
        &self,
        program: Program,
        intake_year: u16,
    ) -> Result<BatchRecord, BatchServiceError> {
        let key = BatchKey::new(program, intake_year);

        for attempt in 1..=self.max_attempts {
            if let Some(existing) = self.repository.find_by_key(&key)? {
                debug!(batch = %existing.name, "batch resolved from store");
                return Ok(existing);
            }

            match self.repository.insert_unique(BatchRecord::new(key)) {
                Ok(created) => {
                    info!(batch = %created.name, batch_id = %created.id, "batch created");
                    return Ok(created);
                }
                Err(RepositoryError::Conflict) => {
                    warn!(%key, attempt, "batch insert lost a race; retrying lookup");
                    if let Some(winner) = self.repository.find_by_key(&key)? {
                        return Ok(winner);
                    }
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(BatchServiceError::Contention {
            key,
            attempts: self.max_attempts,
        })
    }

    pub fn get(&self, batch_id: &BatchId) -> Result<BatchRecord, BatchServiceError> {
        self.repository
            .fetch(batch_id)?
            .ok_or(BatchServiceError::NotFound(*batch_id))
    }

    /// All batches ordered by intake year, then program.
    pub fn list(&self) -> Result<Vec<BatchRecord>, BatchServiceError> {
        let mut batches = self.repository.list()?;
        batches.sort_by_key(|record| (record.key.intake_year, record.key.program));
        Ok(batches)
    }

    /// Replace the visibility record attached to a batch.
    pub fn update_visibility(
        &self,
        batch_id: &BatchId,
        visibility: SectionVisibility,
    ) -> Result<BatchRecord, BatchServiceError> {
        match self.repository.set_visibility(batch_id, visibility) {
            Ok(record) => {
                info!(batch = %record.name, "batch visibility updated");
                Ok(record)
            }
            Err(RepositoryError::NotFound) => Err(BatchServiceError::NotFound(*batch_id)),
            Err(other) => Err(other.into()),
        }
    }
}

/// Error raised by the batch service.
#[derive(Debug, thiserror::Error)]
pub enum BatchServiceError {
    #[error("batch {0} not found")]
    NotFound(BatchId),
    #[error("batch {key} could not be resolved after {attempts} attempt(s)")]
    Contention { key: BatchKey, attempts: u8 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
