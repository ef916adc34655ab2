mod rules;
pub mod weights;

pub use rules::{
    RuleHit, EXTREME_HEAT_CELSIUS, HIGH_HUMIDITY_PERCENT, HIGH_NOISE_DB, LONG_SHIFT_HOURS,
    MAX_ATTAINABLE_SCORE,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::Submission;

/// Scores at or above this are Medium.
pub const MEDIUM_RISK_THRESHOLD: u32 = 4;
/// Scores at or above this are High.
pub const HIGH_RISK_THRESHOLD: u32 = 8;

/// Bucketed risk classification, ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Field or category a rule is tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    WorkHours,
    Temperature,
    Humidity,
    Noise,
    PpeUsage,
    SafetyTraining,
    SupervisorPresence,
    EquipmentCondition,
    WeatherImpact,
    WorkloadLevel,
    CommunicationQuality,
    Department,
    TaskType,
    IncidentHistory,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactor::WorkHours => "Work hours",
            RiskFactor::Temperature => "Temperature",
            RiskFactor::Humidity => "Humidity",
            RiskFactor::Noise => "Noise",
            RiskFactor::PpeUsage => "PPE",
            RiskFactor::SafetyTraining => "Safety training",
            RiskFactor::SupervisorPresence => "Supervision",
            RiskFactor::EquipmentCondition => "Equipment",
            RiskFactor::WeatherImpact => "Weather",
            RiskFactor::WorkloadLevel => "Workload",
            RiskFactor::CommunicationQuality => "Communication",
            RiskFactor::Department => "Department",
            RiskFactor::TaskType => "Task type",
            RiskFactor::IncidentHistory => "Incident history",
        }
    }
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub risk: RiskTier,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// The rule hits behind a [`ScoreResult`], in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub hits: Vec<RuleHit>,
}

impl Scorecard {
    pub fn total(&self) -> u32 {
        self.hits.iter().map(|hit| hit.weight).sum()
    }

    pub fn tier(&self) -> RiskTier {
        RiskTier::from_score(self.total())
    }

    pub fn result(&self) -> ScoreResult {
        ScoreResult {
            risk: self.tier(),
            score: self.total(),
            reasons: self
                .hits
                .iter()
                .filter_map(|hit| hit.reason.clone())
                .collect(),
        }
    }
}

/// Stateless weighted-rule scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn score(&self, submission: &Submission) -> ScoreResult {
        self.scorecard(submission).result()
    }

    pub fn scorecard(&self, submission: &Submission) -> Scorecard {
        Scorecard {
            hits: rules::evaluate(submission),
        }
    }
}

/// Scores a submission with the standard rule set.
pub fn score(submission: &Submission) -> ScoreResult {
    RiskScorer.score(submission)
}
