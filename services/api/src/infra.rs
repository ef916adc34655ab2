use metrics_exporter_prometheus::PrometheusHandle;
use safeguard::assessment::{
    AdvisoryService, AssessmentId, AssessmentRecord, DisabledAdvisor, OpenAiAdvisoryClient,
    StoreError, SubmissionStore,
};
use safeguard::config::AdvisoryConfig;
use safeguard::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoredAssessments {
    by_id: HashMap<AssessmentId, AssessmentRecord>,
    arrival: Vec<AssessmentId>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    records: Arc<Mutex<StoredAssessments>>,
}

impl SubmissionStore for InMemorySubmissionStore {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.by_id.contains_key(&record.assessment_id) {
            return Err(StoreError::Conflict);
        }
        guard.arrival.push(record.assessment_id.clone());
        guard
            .by_id
            .insert(record.assessment_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.by_id.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard
            .arrival
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| guard.by_id.get(id).cloned())
            .collect())
    }
}

/// Picks the OpenAI client when a key is configured, otherwise the disabled stub.
pub(crate) fn build_advisor(
    config: &AdvisoryConfig,
) -> Result<Arc<dyn AdvisoryService>, AppError> {
    match OpenAiAdvisoryClient::from_config(config)? {
        Some(client) => {
            info!(model = client.model(), "advisory model configured");
            Ok(Arc::new(client))
        }
        None => {
            info!("no advisory api key configured; advice disabled");
            Ok(Arc::new(DisabledAdvisor))
        }
    }
}
