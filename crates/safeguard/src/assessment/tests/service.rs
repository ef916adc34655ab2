use std::sync::Arc;

use crate::assessment::advisory::{collect_advice, AdvisoryError, DisabledAdvisor};
use crate::assessment::domain::AssessmentId;
use crate::assessment::repository::StoreError;
use crate::assessment::scoring::RiskTier;
use crate::assessment::service::{AssessmentServiceError, RiskAssessmentService};

use super::common::*;

#[test]
fn assess_scores_and_stores_the_submission() {
    let (service, store, _) = build_service();

    let outcome = service.assess(combined_submission());

    assert!(outcome.persisted);
    assert_eq!(outcome.record.result.score, 15);
    assert_eq!(outcome.record.result.risk, RiskTier::High);
    assert!(outcome.record.assessment_id.0.starts_with("rsk-"));
    assert_eq!(store.len(), 1);

    let fetched = service
        .get(&outcome.record.assessment_id)
        .expect("stored record is retrievable");
    assert_eq!(fetched, outcome.record);
}

#[test]
fn store_failure_still_returns_the_result() {
    let service =
        RiskAssessmentService::new(Arc::new(UnavailableStore), Arc::new(DisabledAdvisor));

    let outcome = service.assess(low_risk_submission());

    assert!(!outcome.persisted);
    assert_eq!(outcome.record.result.score, 0);
    assert_eq!(outcome.record.result.risk, RiskTier::Low);
}

#[test]
fn assessment_ids_are_unique() {
    let (service, store, _) = build_service();

    let first = service.assess(low_risk_submission());
    let second = service.assess(low_risk_submission());

    assert_ne!(first.record.assessment_id, second.record.assessment_id);
    assert_eq!(store.len(), 2);
}

#[test]
fn get_reports_missing_records() {
    let (service, _, _) = build_service();

    let err = service
        .get(&AssessmentId("rsk-missing".to_string()))
        .expect_err("unknown id");

    assert!(matches!(
        err,
        AssessmentServiceError::Store(StoreError::NotFound)
    ));
}

#[test]
fn recent_lists_newest_first() {
    let (service, _, _) = build_service();

    let older = service.assess(low_risk_submission());
    let newer = service.assess(combined_submission());

    let recent = service.recent(10).expect("recent records");
    let ids: Vec<&AssessmentId> = recent.iter().map(|record| &record.assessment_id).collect();
    assert_eq!(
        ids,
        vec![&newer.record.assessment_id, &older.record.assessment_id]
    );

    let limited = service.recent(1).expect("recent records");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].assessment_id, newer.record.assessment_id);
}

#[tokio::test]
async fn advice_is_skipped_below_high_risk() {
    let (service, _, advisor) = build_service();

    let advice = service
        .advise(&low_risk_submission())
        .await
        .expect("advice request");

    assert!(advice.is_none());
    assert!(advisor.prompts().is_empty());
}

#[tokio::test]
async fn high_risk_advice_streams_every_fragment() {
    let (service, store, advisor) = build_service();

    let stream = service
        .advise(&combined_submission())
        .await
        .expect("advice request")
        .expect("high risk submission gets advice");
    let text = collect_advice(stream).await.expect("advice text");

    assert_eq!(text, "Stop work. Replace the faulty rig.");
    assert_eq!(store.len(), 0);

    let prompts = advisor.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0].text;
    assert!(prompt.contains("HSE"));
    assert!(prompt.contains("rated this High risk (score 15)"));
    assert!(prompt.contains("- Faulty equipment"));
    assert!(prompt.contains("\"equipment_condition\": \"Faulty\""));
}

#[tokio::test]
async fn disabled_advisor_surfaces_as_advisory_error() {
    let service = RiskAssessmentService::new(
        Arc::new(MemoryStore::default()),
        Arc::new(DisabledAdvisor),
    );

    let err = match service.advise(&combined_submission()).await {
        Err(err) => err,
        Ok(_) => panic!("disabled advisor must fail"),
    };

    assert!(matches!(
        err,
        AssessmentServiceError::Advisory(AdvisoryError::Disabled)
    ));
}
