use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::OnboardingConfig;
use crate::onboarding::batches::{
    BatchId, BatchKey, BatchRecord, BatchRepository, BatchResolutionService, RepositoryError,
};
use crate::onboarding::profile::SectionVisibility;

pub(crate) fn onboarding_config() -> OnboardingConfig {
    OnboardingConfig::default()
}

pub(crate) fn build_batch_service() -> (
    BatchResolutionService<MemoryBatchRepository>,
    Arc<MemoryBatchRepository>,
) {
    let repository = Arc::new(MemoryBatchRepository::default());
    let service = BatchResolutionService::new(repository.clone(), onboarding_config());
    (service, repository)
}

/// Store whose lookup and insert take the lock separately, so concurrent resolvers genuinely race.
#[derive(Default, Clone)]
pub(crate) struct MemoryBatchRepository {
    records: Arc<Mutex<HashMap<BatchKey, BatchRecord>>>,
    inserts: Arc<AtomicUsize>,
}

impl MemoryBatchRepository {
    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub(crate) fn successful_inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl BatchRepository for MemoryBatchRepository {
    fn find_by_key(&self, key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn insert_unique(&self, record: BatchRecord) -> Result<BatchRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.key, record.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    fn fetch(&self, id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|record| record.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn set_visibility(
        &self,
        id: &BatchId,
        visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .values_mut()
            .find(|record| record.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        record.visibility = Some(visibility);
        Ok(record.clone())
    }
}

/// Simulates losing the insert race: the first lookup misses, the insert conflicts, and the
/// winner's row shows up on the next lookup.
pub(crate) struct LostRaceRepository {
    winner: BatchRecord,
    lookups: AtomicUsize,
}

impl LostRaceRepository {
    pub(crate) fn new(key: BatchKey) -> Self {
        Self {
            winner: BatchRecord::new(key),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(crate) fn winner_id(&self) -> BatchId {
        self.winner.id
    }
}

impl BatchRepository for LostRaceRepository {
    fn find_by_key(&self, _key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError> {
        if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(None)
        } else {
            Ok(Some(self.winner.clone()))
        }
    }

    fn insert_unique(&self, _record: BatchRecord) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError> {
        Ok(Some(self.winner.clone()))
    }

    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError> {
        Ok(vec![self.winner.clone()])
    }

    fn set_visibility(
        &self,
        _id: &BatchId,
        _visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

/// Every insert conflicts but the winning row never becomes visible.
pub(crate) struct PhantomConflictRepository;

impl BatchRepository for PhantomConflictRepository {
    fn find_by_key(&self, _key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError> {
        Ok(None)
    }

    fn insert_unique(&self, _record: BatchRecord) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn set_visibility(
        &self,
        _id: &BatchId,
        _visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(crate) struct UnavailableBatchRepository;

impl BatchRepository for UnavailableBatchRepository {
    fn find_by_key(&self, _key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_unique(&self, _record: BatchRecord) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_visibility(
        &self,
        _id: &BatchId,
        _visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}
