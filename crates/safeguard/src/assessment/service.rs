use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::advisory::{AdviceStream, AdvisoryError, AdvisoryPrompt, AdvisoryService};
use super::domain::{AssessmentId, AssessmentRecord, Submission};
use super::repository::{StoreError, SubmissionStore};
use super::scoring::{RiskScorer, RiskTier, ScoreResult};

/// Service composing the scorer, the submission store, and the advisory model.
pub struct RiskAssessmentService<S> {
    scorer: RiskScorer,
    store: Arc<S>,
    advisor: Arc<dyn AdvisoryService>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("rsk-{id:06}"))
}

/// A scored submission and whether the store accepted it.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    pub record: AssessmentRecord,
    pub persisted: bool,
}

impl<S> RiskAssessmentService<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>, advisor: Arc<dyn AdvisoryService>) -> Self {
        Self {
            scorer: RiskScorer,
            store,
            advisor,
        }
    }

    /// Score without persisting anything.
    pub fn score(&self, submission: &Submission) -> ScoreResult {
        self.scorer.score(submission)
    }

    /// Score a submission and hand it to the store.
    ///
    /// Storage is fire-and-forget: a failed insert is logged and reported through
    /// `persisted`, never as an error.
    pub fn assess(&self, submission: Submission) -> AssessmentOutcome {
        let result = self.scorer.score(&submission);
        let record = AssessmentRecord {
            assessment_id: next_assessment_id(),
            created_at: Utc::now(),
            submission,
            result,
        };

        info!(
            assessment_id = %record.assessment_id,
            score = record.result.score,
            risk = %record.result.risk,
            "risk assessment scored"
        );

        let persisted = match self.store.insert(record.clone()) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    assessment_id = %record.assessment_id,
                    error = %err,
                    "failed to store assessment"
                );
                false
            }
        };

        AssessmentOutcome { record, persisted }
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.store.recent(limit)?)
    }

    /// Request advice for a High-risk submission.
    ///
    /// Returns `Ok(None)` without contacting the advisor when the tier is below High.
    pub async fn advise(
        &self,
        submission: &Submission,
    ) -> Result<Option<AdviceStream>, AssessmentServiceError> {
        let result = self.scorer.score(submission);
        if result.risk != RiskTier::High {
            return Ok(None);
        }

        let prompt = AdvisoryPrompt::build(submission, &result)?;
        let stream = self.advisor.stream_advice(prompt).await.map_err(|err| {
            warn!(error = %err, "advisory request failed");
            err
        })?;
        Ok(Some(stream))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
}
