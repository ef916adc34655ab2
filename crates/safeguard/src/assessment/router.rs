use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::advisory::AdvisoryError;
use super::domain::{AssessmentId, Submission};
use super::repository::{AssessmentDetailView, StoreError, SubmissionStore};
use super::service::{AssessmentServiceError, RiskAssessmentService};

pub const DEFAULT_RECENT_LIMIT: usize = 20;
pub const MAX_RECENT_LIMIT: usize = 100;

/// Router builder exposing HTTP endpoints for scoring, storage, and advice.
pub fn assessment_router<S>(service: Arc<RiskAssessmentService<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route("/api/v1/risk/analyze", post(analyze_handler::<S>))
        .route("/api/v1/risk/advice", post(advice_handler::<S>))
        .route(
            "/api/v1/assessments",
            post(submit_handler::<S>).get(recent_handler::<S>),
        )
        .route("/api/v1/assessments/:assessment_id", get(status_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecentQuery {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn analyze_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let submission = match parse_submission(payload) {
        Ok(submission) => submission,
        Err(response) => return response,
    };
    let result = service.score(&submission);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let submission = match parse_submission(payload) {
        Ok(submission) => submission,
        Err(response) => return response,
    };
    let outcome = service.assess(submission);
    let view = outcome.record.summary_view(outcome.persisted);
    (StatusCode::CREATED, axum::Json(view)).into_response()
}

pub(crate) async fn recent_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    match service.recent(limit) {
        Ok(records) => {
            let views: Vec<AssessmentDetailView> =
                records.iter().map(|record| record.detail_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.detail_view())).into_response(),
        Err(AssessmentServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "assessment_id": id.0,
                "error": "assessment not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn advice_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let submission = match parse_submission(payload) {
        Ok(submission) => submission,
        Err(response) => return response,
    };
    match service.advise(&submission).await {
        Ok(Some(stream)) => {
            let stream =
                stream.inspect_err(|err| warn!(error = %err, "advisory stream interrupted"));
            let headers = [
                (header::CONTENT_TYPE, mime::TEXT_EVENT_STREAM.to_string()),
                (header::CACHE_CONTROL, "no-cache, no-transform".to_string()),
            ];
            (StatusCode::OK, headers, Body::from_stream(stream)).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(AssessmentServiceError::Advisory(AdvisoryError::Disabled)) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, AdvisoryError::Disabled.to_string())
        }
        Err(AssessmentServiceError::Advisory(err)) => {
            error_response(StatusCode::BAD_GATEWAY, err.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn parse_submission(payload: Value) -> Result<Submission, Response> {
    Submission::from_json(payload)
        .map_err(|err| error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
