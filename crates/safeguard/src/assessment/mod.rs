//! Workplace hazard intake, rule-based risk scoring, storage, and advisory.
//!
//! The scorer is a pure function over a normalized [`Submission`]; everything else
//! in this module wires it to a store, an advisory model, and HTTP routes.

pub mod advisory;
pub mod dashboard;
pub mod domain;
pub mod import;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use advisory::{
    collect_advice, AdviceStream, AdvisoryError, AdvisoryPrompt, AdvisoryService, DisabledAdvisor,
    OpenAiAdvisoryClient,
};
pub use dashboard::{FactorShare, GaugeBand, RiskBreakdown};
pub use domain::{
    AssessmentId, AssessmentRecord, Choice, CommunicationQuality, Department, EquipmentCondition,
    Gender, IncidentType, Submission, TaskType, WeatherImpact, WorkloadLevel,
};
pub use import::{SubmissionCsvImporter, SubmissionImportError};
pub use repository::{AssessmentDetailView, AssessmentView, StoreError, SubmissionStore};
pub use router::assessment_router;
pub use scoring::{score, RiskFactor, RiskScorer, RiskTier, RuleHit, ScoreResult, Scorecard};
pub use service::{AssessmentOutcome, AssessmentServiceError, RiskAssessmentService};
