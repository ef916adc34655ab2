use super::common::*;
use crate::assessment::dashboard::{GaugeBand, RiskBreakdown};
use crate::assessment::domain::{
    CommunicationQuality, Department, EquipmentCondition, IncidentType, Submission, TaskType,
    WeatherImpact, WorkloadLevel,
};
use crate::assessment::scoring::{score, RiskFactor, RiskScorer, RiskTier, MAX_ATTAINABLE_SCORE};

fn worst_case_submission() -> Submission {
    Submission {
        work_hours: Some(16.0),
        temperature: Some(50.0),
        humidity: Some(95.0),
        noise_level: Some(110.0),
        ppe_usage: Some(false),
        safety_training: Some(false),
        supervisor_presence: Some(false),
        equipment_condition: Some(EquipmentCondition::Faulty),
        weather_impact: Some(WeatherImpact::ExtremeHeat),
        workload_level: Some(WorkloadLevel::Extreme),
        communication_quality: Some(CommunicationQuality::Poor),
        department: Some(Department::Rig),
        task_type: Some(TaskType::Lifting),
        previous_incidents: vec![IncidentType::Fatality, IncidentType::Injury],
        ..Submission::default()
    }
}

#[test]
fn empty_submission_scores_zero() {
    let result = score(&Submission::default());

    assert_eq!(result.score, 0);
    assert!(result.reasons.is_empty());
    assert_eq!(result.risk, RiskTier::Low);
}

#[test]
fn long_shift_alone_stays_low() {
    let result = score(&Submission {
        work_hours: Some(13.0),
        ..Submission::default()
    });

    assert_eq!(result.score, 2);
    assert_eq!(result.reasons, vec!["Long work hours (>12)".to_string()]);
    assert_eq!(result.risk, RiskTier::Low);
}

#[test]
fn thresholds_are_exclusive_for_hours_and_inclusive_for_environment() {
    let at_limits = score(&Submission {
        work_hours: Some(12.0),
        temperature: Some(45.0),
        humidity: Some(80.0),
        noise_level: Some(85.0),
        ..Submission::default()
    });
    assert_eq!(
        at_limits.reasons,
        vec![
            "Extreme heat (≥45°C)".to_string(),
            "High humidity (≥80%)".to_string(),
            "High noise (≥85 dB)".to_string(),
        ]
    );
    assert_eq!(at_limits.score, 4);

    let below = score(&Submission {
        temperature: Some(44.9),
        humidity: Some(79.0),
        noise_level: Some(84.0),
        ..Submission::default()
    });
    assert_eq!(below.score, 0);
}

#[test]
fn ppe_only_counts_when_explicitly_false() {
    let missing = score(&Submission::default());
    assert_eq!(missing.score, 0);

    let worn = score(&Submission {
        ppe_usage: Some(true),
        ..Submission::default()
    });
    assert_eq!(worn.score, 0);

    let not_worn = score(&Submission {
        ppe_usage: Some(false),
        ..Submission::default()
    });
    assert_eq!(not_worn.score, 3);
    assert_eq!(not_worn.reasons, vec!["PPE not used".to_string()]);
    assert_eq!(not_worn.risk, RiskTier::Low);
}

#[test]
fn faulty_equipment_alone() {
    let result = score(&Submission {
        equipment_condition: Some(EquipmentCondition::Faulty),
        ..Submission::default()
    });

    assert_eq!(result.score, 3);
    assert_eq!(result.reasons, vec!["Faulty equipment".to_string()]);
}

#[test]
fn zero_weight_selections_follow_their_reason_policy() {
    let good_equipment = score(&Submission {
        equipment_condition: Some(EquipmentCondition::Good),
        weather_impact: Some(WeatherImpact::Clear),
        workload_level: Some(WorkloadLevel::Normal),
        communication_quality: Some(CommunicationQuality::Good),
        ..Submission::default()
    });
    assert_eq!(good_equipment.score, 0);
    assert!(good_equipment.reasons.is_empty());

    let office = score(&Submission {
        department: Some(Department::Office),
        task_type: Some(TaskType::Office),
        ..Submission::default()
    });
    assert_eq!(office.score, 0);
    assert_eq!(
        office.reasons,
        vec![
            "Department: Office".to_string(),
            "Task type: Office".to_string()
        ]
    );
}

#[test]
fn category_reasons_use_display_labels() {
    let result = score(&Submission {
        equipment_condition: Some(EquipmentCondition::NeedsMaintenance),
        weather_impact: Some(WeatherImpact::ExtremeHeat),
        workload_level: Some(WorkloadLevel::Extreme),
        communication_quality: Some(CommunicationQuality::Fair),
        department: Some(Department::Wellhead),
        task_type: Some(TaskType::Maintenance),
        ..Submission::default()
    });

    assert_eq!(
        result.reasons,
        vec![
            "Equipment needs maintenance".to_string(),
            "Weather impact: ExtremeHeat".to_string(),
            "Workload: Extreme".to_string(),
            "Communication: Fair".to_string(),
            "Department: Wellhead".to_string(),
            "Task type: Maintenance".to_string(),
        ]
    );
    assert_eq!(result.score, 2 + 2 + 2 + 1 + 2 + 1);
    assert_eq!(result.risk, RiskTier::High);
}

#[test]
fn incident_history_is_capped_but_listed_once() {
    let result = score(&Submission {
        previous_incidents: vec![IncidentType::Fatality, IncidentType::Fatality],
        ..Submission::default()
    });

    assert_eq!(result.score, 5);
    assert_eq!(
        result.reasons,
        vec!["Incident history: Fatality, Fatality".to_string()]
    );

    let mixed = score(&Submission {
        previous_incidents: vec![
            IncidentType::AssetDamage,
            IncidentType::Nearmiss,
            IncidentType::AssetDamage,
        ],
        ..Submission::default()
    });
    assert_eq!(mixed.score, 5);
    assert_eq!(
        mixed.reasons,
        vec!["Incident history: Asset damage, Nearmiss, Asset damage".to_string()]
    );
}

#[test]
fn combined_case_reports_reasons_in_evaluation_order() {
    let result = score(&combined_submission());

    assert_eq!(result.score, 15);
    assert_eq!(result.risk, RiskTier::High);
    assert_eq!(
        result.reasons,
        vec![
            "Long work hours (>12)",
            "Extreme heat (≥45°C)",
            "High humidity (≥80%)",
            "High noise (≥85 dB)",
            "PPE not used",
            "Faulty equipment",
            "Weather impact: Rain",
            "Workload: High",
            "Incident history: Nearmiss",
        ]
    );
}

#[test]
fn adding_a_trigger_never_lowers_the_score() {
    let triggers: Vec<fn(&mut Submission)> = vec![
        |s: &mut Submission| s.work_hours = Some(14.0),
        |s: &mut Submission| s.temperature = Some(48.0),
        |s: &mut Submission| s.humidity = Some(90.0),
        |s: &mut Submission| s.noise_level = Some(100.0),
        |s: &mut Submission| s.ppe_usage = Some(false),
        |s: &mut Submission| s.safety_training = Some(false),
        |s: &mut Submission| s.supervisor_presence = Some(false),
        |s: &mut Submission| s.equipment_condition = Some(EquipmentCondition::NeedsMaintenance),
        |s: &mut Submission| s.weather_impact = Some(WeatherImpact::Dust),
        |s: &mut Submission| s.workload_level = Some(WorkloadLevel::High),
        |s: &mut Submission| s.communication_quality = Some(CommunicationQuality::Poor),
        |s: &mut Submission| s.department = Some(Department::Transport),
        |s: &mut Submission| s.task_type = Some(TaskType::Drilling),
        |s: &mut Submission| s.previous_incidents.push(IncidentType::Injury),
    ];
    let bases = [
        Submission::default(),
        low_risk_submission(),
        Submission {
            work_hours: Some(13.0),
            ppe_usage: Some(false),
            previous_incidents: vec![IncidentType::Fatality],
            ..Submission::default()
        },
    ];

    for base in &bases {
        let baseline = score(base).score;
        for trigger in &triggers {
            let mut changed = base.clone();
            trigger(&mut changed);
            assert!(
                score(&changed).score >= baseline,
                "trigger lowered score for {changed:?}"
            );
        }
    }
}

#[test]
fn scoring_is_idempotent() {
    let submission = combined_submission();
    let scorer = RiskScorer;

    assert_eq!(scorer.score(&submission), scorer.score(&submission));
    assert_eq!(scorer.scorecard(&submission), scorer.scorecard(&submission));
}

#[test]
fn tier_boundaries_are_exact() {
    assert_eq!(RiskTier::from_score(0), RiskTier::Low);
    assert_eq!(RiskTier::from_score(3), RiskTier::Low);
    assert_eq!(RiskTier::from_score(4), RiskTier::Medium);
    assert_eq!(RiskTier::from_score(7), RiskTier::Medium);
    assert_eq!(RiskTier::from_score(8), RiskTier::High);
    assert!(RiskTier::Low < RiskTier::Medium && RiskTier::Medium < RiskTier::High);

    let four = score(&Submission {
        ppe_usage: Some(false),
        humidity: Some(85.0),
        ..Submission::default()
    });
    assert_eq!((four.score, four.risk), (4, RiskTier::Medium));

    let seven = score(&Submission {
        ppe_usage: Some(false),
        safety_training: Some(false),
        work_hours: Some(13.0),
        ..Submission::default()
    });
    assert_eq!((seven.score, seven.risk), (7, RiskTier::Medium));

    let eight = score(&Submission {
        ppe_usage: Some(false),
        safety_training: Some(false),
        work_hours: Some(13.0),
        noise_level: Some(90.0),
        ..Submission::default()
    });
    assert_eq!((eight.score, eight.risk), (8, RiskTier::High));
}

#[test]
fn worst_case_reaches_the_maximum_score() {
    let submission = worst_case_submission();
    let scorecard = RiskScorer.scorecard(&submission);

    assert_eq!(scorecard.total(), MAX_ATTAINABLE_SCORE);
    assert_eq!(scorecard.hits.len(), 14);

    let breakdown = RiskBreakdown::from_scorecard(&scorecard);
    assert_eq!(breakdown.risk_percent, 100);
    assert_eq!(breakdown.gauge, GaugeBand::Red);
    assert_eq!(breakdown.factors.len(), 14);
}

#[test]
fn breakdown_skips_zero_weight_hits() {
    let submission = Submission {
        department: Some(Department::Office),
        ppe_usage: Some(false),
        equipment_condition: Some(EquipmentCondition::NeedsMaintenance),
        ..Submission::default()
    };
    let scorecard = RiskScorer.scorecard(&submission);
    let breakdown = RiskBreakdown::from_scorecard(&scorecard);

    assert_eq!(breakdown.score, 5);
    assert_eq!(breakdown.risk, RiskTier::Medium);
    assert_eq!(breakdown.risk_percent, 17);
    assert_eq!(breakdown.gauge, GaugeBand::Green);
    let names: Vec<&str> = breakdown.factors.iter().map(|factor| factor.name).collect();
    assert_eq!(
        names,
        vec![
            RiskFactor::PpeUsage.label(),
            RiskFactor::EquipmentCondition.label()
        ]
    );
    assert_eq!(breakdown.factors[0].value, 60);
    assert_eq!(breakdown.factors[1].value, 40);
}
