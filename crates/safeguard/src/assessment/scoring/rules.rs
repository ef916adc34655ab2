use serde::Serialize;

use crate::assessment::domain::{
    Choice, CommunicationQuality, EquipmentCondition, Submission, WeatherImpact, WorkloadLevel,
};

use super::weights::{
    category_weight, incident_history_weight, CategoryWeight, INCIDENT_HISTORY_CAP,
};
use super::RiskFactor;

/// Shifts strictly longer than this add to the score.
pub const LONG_SHIFT_HOURS: f64 = 12.0;
pub const EXTREME_HEAT_CELSIUS: f64 = 45.0;
pub const HIGH_HUMIDITY_PERCENT: f64 = 80.0;
pub const HIGH_NOISE_DB: f64 = 85.0;

/// Highest score any submission can reach.
pub const MAX_ATTAINABLE_SCORE: u32 = 30;

/// One evaluated rule: the weight it added and the reason it surfaced, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub factor: RiskFactor,
    pub weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RuleHit {
    fn new(factor: RiskFactor, weight: u32, reason: impl Into<String>) -> Self {
        Self {
            factor,
            weight,
            reason: Some(reason.into()),
        }
    }

    fn silent(factor: RiskFactor, weight: u32) -> Self {
        Self {
            factor,
            weight,
            reason: None,
        }
    }
}

/// Evaluates the fixed rule list in order.
///
/// Threshold and explicit-`false` rules only produce a hit when they fire.
/// Category rules produce a hit whenever a value is selected, even when its
/// weight is zero, so the reason policy of each category stays in one place.
pub(crate) fn evaluate(submission: &Submission) -> Vec<RuleHit> {
    let mut hits = Vec::new();

    if submission.work_hours.unwrap_or(0.0) > LONG_SHIFT_HOURS {
        hits.push(RuleHit::new(RiskFactor::WorkHours, 2, "Long work hours (>12)"));
    }
    if submission.temperature.unwrap_or(0.0) >= EXTREME_HEAT_CELSIUS {
        hits.push(RuleHit::new(RiskFactor::Temperature, 2, "Extreme heat (≥45°C)"));
    }
    if submission.humidity.unwrap_or(0.0) >= HIGH_HUMIDITY_PERCENT {
        hits.push(RuleHit::new(RiskFactor::Humidity, 1, "High humidity (≥80%)"));
    }
    if submission.noise_level.unwrap_or(0.0) >= HIGH_NOISE_DB {
        hits.push(RuleHit::new(RiskFactor::Noise, 1, "High noise (≥85 dB)"));
    }

    // Only an explicit `false` counts; an unanswered question is not a violation.
    if submission.ppe_usage == Some(false) {
        hits.push(RuleHit::new(RiskFactor::PpeUsage, 3, "PPE not used"));
    }
    if submission.safety_training == Some(false) {
        hits.push(RuleHit::new(RiskFactor::SafetyTraining, 2, "No safety training"));
    }
    if submission.supervisor_presence == Some(false) {
        hits.push(RuleHit::new(
            RiskFactor::SupervisorPresence,
            1,
            "No supervisor present",
        ));
    }

    if let Some(condition) = submission.equipment_condition {
        let weight = category_weight(Some(condition));
        hits.push(match condition {
            EquipmentCondition::Good => RuleHit::silent(RiskFactor::EquipmentCondition, weight),
            EquipmentCondition::NeedsMaintenance => RuleHit::new(
                RiskFactor::EquipmentCondition,
                weight,
                "Equipment needs maintenance",
            ),
            EquipmentCondition::Faulty => {
                RuleHit::new(RiskFactor::EquipmentCondition, weight, "Faulty equipment")
            }
        });
    }

    if let Some(weather) = submission.weather_impact {
        hits.push(labelled_unless(
            RiskFactor::WeatherImpact,
            weather,
            WeatherImpact::Clear,
            "Weather impact",
        ));
    }
    if let Some(workload) = submission.workload_level {
        hits.push(labelled_unless(
            RiskFactor::WorkloadLevel,
            workload,
            WorkloadLevel::Normal,
            "Workload",
        ));
    }
    if let Some(communication) = submission.communication_quality {
        hits.push(labelled_unless(
            RiskFactor::CommunicationQuality,
            communication,
            CommunicationQuality::Good,
            "Communication",
        ));
    }

    // Department and task type always explain themselves, Office included.
    if let Some(department) = submission.department {
        hits.push(RuleHit::new(
            RiskFactor::Department,
            category_weight(Some(department)),
            format!("Department: {}", department.label()),
        ));
    }
    if let Some(task) = submission.task_type {
        hits.push(RuleHit::new(
            RiskFactor::TaskType,
            category_weight(Some(task)),
            format!("Task type: {}", task.label()),
        ));
    }

    if !submission.previous_incidents.is_empty() {
        let listed = submission
            .previous_incidents
            .iter()
            .map(|incident| incident.label())
            .collect::<Vec<_>>()
            .join(", ");
        hits.push(RuleHit::new(
            RiskFactor::IncidentHistory,
            incident_history_weight(&submission.previous_incidents, INCIDENT_HISTORY_CAP),
            format!("Incident history: {listed}"),
        ));
    }

    hits
}

fn labelled_unless<T>(factor: RiskFactor, value: T, baseline: T, prefix: &str) -> RuleHit
where
    T: Choice + CategoryWeight + PartialEq,
{
    let weight = category_weight(Some(value));
    if value == baseline {
        RuleHit::silent(factor, weight)
    } else {
        RuleHit::new(factor, weight, format!("{prefix}: {}", value.label()))
    }
}
