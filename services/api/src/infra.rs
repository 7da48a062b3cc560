use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use student_erp::config::OnboardingConfig;
use student_erp::onboarding::batches::{
    BatchId, BatchKey, BatchRecord, BatchRepository, BatchResolutionService, RepositoryError,
};
use student_erp::onboarding::profile::{
    SectionVisibility, StudentId, StudentProfileService, StudentRecord, StudentRepository,
};

pub(crate) type OnboardingService =
    StudentProfileService<InMemoryStudentRepository, InMemoryBatchRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) students: Arc<OnboardingService>,
}

/// Batches keyed by `(program, intake_year)`; the key check and the write share one lock.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBatchRepository {
    records: Arc<Mutex<HashMap<BatchKey, BatchRecord>>>,
}

impl BatchRepository for InMemoryBatchRepository {
    fn find_by_key(&self, key: &BatchKey) -> Result<Option<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn insert_unique(&self, record: BatchRecord) -> Result<BatchRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.key, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &BatchId) -> Result<Option<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().find(|record| record.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<BatchRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn set_visibility(
        &self,
        id: &BatchId,
        visibility: SectionVisibility,
    ) -> Result<BatchRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        let record = guard
            .values_mut()
            .find(|record| record.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        record.visibility = Some(visibility);
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStudentRepository {
    records: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
}

impl StudentRepository for InMemoryStudentRepository {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.student_id)
            || guard.values().any(|existing| existing.email == record.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.student_id, record.clone());
        Ok(record)
    }

    fn modify<F>(&self, id: &StudentId, change: F) -> Result<StudentRecord, RepositoryError>
    where
        F: FnOnce(&mut StudentRecord),
    {
        let mut guard = self.records.lock().map_err(poisoned)?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().find(|record| record.email == email).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Services wired over fresh in-memory stores.
pub(crate) fn in_memory_services(
    config: OnboardingConfig,
) -> (
    Arc<OnboardingService>,
    Arc<BatchResolutionService<InMemoryBatchRepository>>,
) {
    let batches = Arc::new(BatchResolutionService::new(
        Arc::new(InMemoryBatchRepository::default()),
        config,
    ));
    let students = Arc::new(StudentProfileService::new(
        Arc::new(InMemoryStudentRepository::default()),
        batches.clone(),
    ));
    (students, batches)
}
