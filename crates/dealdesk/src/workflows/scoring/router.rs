use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DealId, NewDeal, ScoreOverride, ScoreSubmission};
use super::repository::{ApprovalPublisher, DealRepository, RepositoryError};
use super::service::{DealScoringError, DealScoringService};

/// Router builder exposing HTTP endpoints for deal intake, scoring, and calculation.
pub fn scoring_router<R, P>(service: Arc<DealScoringService<R, P>>) -> Router
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    Router::new()
        .route("/api/v1/deals", post(create_handler::<R, P>))
        .route("/api/v1/deals/:deal_id", get(status_handler::<R, P>))
        .route(
            "/api/v1/deals/:deal_id/scores",
            post(submit_score_handler::<R, P>),
        )
        .route(
            "/api/v1/deals/:deal_id/calculate",
            post(calculate_handler::<R, P>),
        )
        .route(
            "/api/v1/deals/:deal_id/simulate",
            post(simulate_handler::<R, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulateRequest {
    #[serde(default)]
    pub(crate) overrides: Vec<ScoreOverride>,
}

pub(crate) async fn create_handler<R, P>(
    State(service): State<Arc<DealScoringService<R, P>>>,
    axum::Json(new_deal): axum::Json<NewDeal>,
) -> Response
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    match service.create(new_deal) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, P>(
    State(service): State<Arc<DealScoringService<R, P>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    let id = DealId(deal_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_score_handler<R, P>(
    State(service): State<Arc<DealScoringService<R, P>>>,
    Path(deal_id): Path<String>,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    let id = DealId(deal_id);
    match service.submit_score(&id, submission) {
        Ok(score) => (StatusCode::ACCEPTED, axum::Json(score)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calculate_handler<R, P>(
    State(service): State<Arc<DealScoringService<R, P>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    let id = DealId(deal_id);
    match service.calculate(&id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn simulate_handler<R, P>(
    State(service): State<Arc<DealScoringService<R, P>>>,
    Path(deal_id): Path<String>,
    axum::Json(request): axum::Json<SimulateRequest>,
) -> Response
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    let id = DealId(deal_id);
    match service.simulate(&id, &request.overrides) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DealScoringError) -> Response {
    let status = match &error {
        DealScoringError::UnknownAttribute(_)
        | DealScoringError::Catalog(_)
        | DealScoringError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DealScoringError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DealScoringError::Repository(
            RepositoryError::Conflict | RepositoryError::StaleVersion { .. },
        ) => StatusCode::CONFLICT,
        DealScoringError::Repository(RepositoryError::Unavailable(_))
        | DealScoringError::Approval(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
