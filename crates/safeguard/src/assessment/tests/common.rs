use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use futures::StreamExt;
use serde_json::{json, Value};

use crate::assessment::advisory::{AdviceStream, AdvisoryError, AdvisoryPrompt, AdvisoryService};
use crate::assessment::domain::{AssessmentId, AssessmentRecord, Submission};
use crate::assessment::repository::{StoreError, SubmissionStore};
use crate::assessment::{assessment_router, RiskAssessmentService};

/// The combined hazard case: every reason fires exactly once, score 15.
pub(super) fn combined_payload() -> Value {
    json!({
        "work_hours": 13,
        "temperature": 46,
        "humidity": 82,
        "noise_level": 92,
        "ppe_usage": false,
        "equipment_condition": "Faulty",
        "weather_impact": "Rain",
        "workload_level": "High",
        "previous_incidents": ["Nearmiss"]
    })
}

pub(super) fn combined_submission() -> Submission {
    serde_json::from_value(combined_payload()).expect("combined payload deserializes")
}

pub(super) fn low_risk_submission() -> Submission {
    serde_json::from_value(json!({
        "employee_name": "Aisha Al Balushi",
        "department": "Office",
        "task_type": "Office",
        "work_hours": 8,
        "ppe_usage": true,
        "safety_training": true
    }))
    .expect("low risk payload deserializes")
}

pub(super) fn build_service() -> (
    RiskAssessmentService<MemoryStore>,
    Arc<MemoryStore>,
    ScriptedAdvisor,
) {
    let store = Arc::new(MemoryStore::default());
    let advisor = ScriptedAdvisor::new(&["Stop work. ", "Replace the faulty rig."]);
    let service = RiskAssessmentService::new(store.clone(), Arc::new(advisor.clone()));
    (service, store, advisor)
}

pub(super) fn router_with_service(service: RiskAssessmentService<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.assessment_id == record.assessment_id)
        {
            return Err(StoreError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.assessment_id == id)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableStore;

impl SubmissionStore for UnavailableStore {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Replays fixed fragments and records every prompt it receives.
#[derive(Default, Clone)]
pub(super) struct ScriptedAdvisor {
    fragments: Vec<String>,
    prompts: Arc<Mutex<Vec<AdvisoryPrompt>>>,
}

impl ScriptedAdvisor {
    pub(super) fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|fragment| fragment.to_string()).collect(),
            prompts: Arc::default(),
        }
    }

    pub(super) fn prompts(&self) -> Vec<AdvisoryPrompt> {
        self.prompts.lock().expect("advisor mutex poisoned").clone()
    }
}

#[async_trait]
impl AdvisoryService for ScriptedAdvisor {
    async fn stream_advice(&self, prompt: AdvisoryPrompt) -> Result<AdviceStream, AdvisoryError> {
        self.prompts
            .lock()
            .expect("advisor mutex poisoned")
            .push(prompt);
        let fragments: Vec<Result<String, AdvisoryError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        Ok(futures::stream::iter(fragments).boxed())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
