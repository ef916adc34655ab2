use serde::Serialize;

use super::dashboard::RiskBreakdown;
use super::domain::{AssessmentId, AssessmentRecord, Submission};
use super::scoring::{RiskScorer, RiskTier};

/// Storage sink for scored submissions.
pub trait SubmissionStore: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, StoreError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError>;
    /// Most recent records first.
    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl AssessmentRecord {
    pub fn advice_recommended(&self) -> bool {
        self.result.risk == RiskTier::High
    }

    pub fn summary_view(&self, persisted: bool) -> AssessmentView {
        AssessmentView {
            assessment_id: self.assessment_id.clone(),
            persisted,
            risk: self.result.risk,
            score: self.result.score,
            reasons: self.result.reasons.clone(),
            advice_recommended: self.advice_recommended(),
        }
    }

    pub fn detail_view(&self) -> AssessmentDetailView {
        let scorecard = RiskScorer.scorecard(&self.submission);
        AssessmentDetailView {
            assessment_id: self.assessment_id.clone(),
            created_at: self.created_at.to_rfc3339(),
            submission: self.submission.clone(),
            risk: self.result.risk,
            score: self.result.score,
            reasons: self.result.reasons.clone(),
            dashboard: RiskBreakdown::from_scorecard(&scorecard),
        }
    }
}

/// Response body for a submitted assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub assessment_id: AssessmentId,
    pub persisted: bool,
    pub risk: RiskTier,
    pub score: u32,
    pub reasons: Vec<String>,
    pub advice_recommended: bool,
}

/// Stored assessment together with its dashboard breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentDetailView {
    pub assessment_id: AssessmentId,
    pub created_at: String,
    pub submission: Submission,
    pub risk: RiskTier,
    pub score: u32,
    pub reasons: Vec<String>,
    pub dashboard: RiskBreakdown,
}
