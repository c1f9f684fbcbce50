use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::Utc;
use dealdesk::workflows::scoring::{
    scoring_router, ApprovalPublisher, AttributeCatalog, AttributeId, DealRepository, DealScore,
    DealScoringService, ScoringAttribute, ScoringEngine, ScoringThresholds,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One hypothetical measurement in a stateless preview request.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewMeasurement {
    pub(crate) attribute_id: AttributeId,
    pub(crate) raw_value: f64,
}

/// Stateless scoring request: a rubric, measurements, and optional threshold
/// overrides. Nothing touches storage; this backs the what-if panel.
#[derive(Debug, Deserialize)]
pub(crate) struct ScorePreviewRequest {
    pub(crate) attributes: Vec<ScoringAttribute>,
    pub(crate) measurements: Vec<PreviewMeasurement>,
    #[serde(default)]
    pub(crate) thresholds: Option<ScoringThresholds>,
}

pub(crate) fn with_scoring_routes<R, P>(service: Arc<DealScoringService<R, P>>) -> axum::Router
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/scoring/preview",
            axum::routing::post(score_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_preview_endpoint(
    Json(payload): Json<ScorePreviewRequest>,
) -> Response {
    let ScorePreviewRequest {
        attributes,
        measurements,
        thresholds,
    } = payload;

    let catalog = match AttributeCatalog::new(attributes) {
        Ok(catalog) => catalog,
        Err(violation) => {
            let body = json!({ "error": violation.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }
    };

    let thresholds = thresholds
        .map(|t| ScoringThresholds::new(t.green_min, t.yellow_min, t.auto_approve_green))
        .unwrap_or_default();
    let engine = ScoringEngine::new(thresholds);

    let mut scores = BTreeMap::new();
    for measurement in measurements {
        if let Some(attribute) = catalog.find(&measurement.attribute_id) {
            scores.insert(
                attribute.id.clone(),
                DealScore {
                    attribute_id: attribute.id.clone(),
                    raw_value: measurement.raw_value,
                    normalized_score: dealdesk::workflows::scoring::normalize(
                        attribute,
                        measurement.raw_value,
                    ),
                    scored_by: "preview".to_string(),
                    scored_at: Utc::now(),
                },
            );
        }
    }

    match engine.score(catalog.active(), &scores) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use dealdesk::workflows::scoring::AttributeCategory;
    use serde_json::Value;

    fn preview_attribute(id: &str, weight: f64, max_value: f64, higher: bool) -> ScoringAttribute {
        ScoringAttribute {
            id: AttributeId(id.to_string()),
            name: id.to_string(),
            category: AttributeCategory::Financial,
            weight,
            min_value: 0.0,
            max_value,
            higher_is_better: higher,
            green_threshold: 70.0,
            yellow_threshold: 40.0,
            is_active: true,
        }
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn preview_scores_a_payload_without_storage() {
        let request = ScorePreviewRequest {
            attributes: vec![
                preview_attribute("margin", 2.0, 100.0, true),
                preview_attribute("discount", 1.0, 50.0, false),
            ],
            measurements: vec![
                PreviewMeasurement {
                    attribute_id: AttributeId("margin".to_string()),
                    raw_value: 80.0,
                },
                PreviewMeasurement {
                    attribute_id: AttributeId("discount".to_string()),
                    raw_value: 10.0,
                },
            ],
            thresholds: None,
        };

        let response = score_preview_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_score"], 80.0);
        assert_eq!(body["classification"], "green");
    }

    #[tokio::test]
    async fn preview_rejects_a_defective_rubric() {
        let mut broken = preview_attribute("margin", 2.0, 100.0, true);
        broken.max_value = 0.0;
        let request = ScorePreviewRequest {
            attributes: vec![broken],
            measurements: Vec::new(),
            thresholds: None,
        };

        let response = score_preview_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
