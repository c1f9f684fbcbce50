use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::scoring::router::{
    calculate_handler, create_handler, status_handler, submit_score_handler,
};

#[tokio::test]
async fn create_handler_returns_created_with_status_view() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);

    let response = create_handler::<MemoryRepository, MemoryApprovals>(
        State(service),
        axum::Json(new_deal()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "unscored");
    assert_eq!(body["routing_rationale"], "pending calculation");
    assert!(body["deal_id"].as_str().expect("id present").starts_with("deal-"));
}

#[tokio::test]
async fn submit_handler_rejects_unknown_attributes() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let record = service.create(new_deal()).expect("deal created");

    let response = submit_score_handler::<MemoryRepository, MemoryApprovals>(
        State(service),
        Path(record.deal.id.0.clone()),
        axum::Json(submission("made_up", 3.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error present")
        .contains("made_up"));
}

#[tokio::test]
async fn status_handler_returns_not_found_for_missing_deals() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);

    let response = status_handler::<MemoryRepository, MemoryApprovals>(
        State(service),
        Path("deal-999999".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn calculate_handler_rejects_an_unscored_deal() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let record = service.create(new_deal()).expect("deal created");

    let response = calculate_handler::<MemoryRepository, MemoryApprovals>(
        State(service),
        Path(record.deal.id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn router_serves_a_full_scoring_pass() {
    let (service, _, _) = build_service();
    let record = service.create(new_deal()).expect("deal created");
    let router = scoring_router_with_service(service);

    let submit = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/deals/{}/scores", record.deal.id.0))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "attribute_id": "gross_margin_percent",
                "raw_value": 80.0,
                "scored_by": "desk-analyst",
            })
            .to_string(),
        ))
        .expect("request builds");
    let response = router.clone().oneshot(submit).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let submit = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/deals/{}/scores", record.deal.id.0))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "attribute_id": "discount_percent",
                "raw_value": 10.0,
                "scored_by": "desk-analyst",
            })
            .to_string(),
        ))
        .expect("request builds");
    let response = router.clone().oneshot(submit).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let calculate = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/deals/{}/calculate", record.deal.id.0))
        .body(Body::empty())
        .expect("request builds");
    let response = router
        .clone()
        .oneshot(calculate)
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_score"], 80.0);
    assert_eq!(body["classification"], "green");
    assert_eq!(body["fully_scored"], true);

    let status = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/deals/{}", record.deal.id.0))
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(status).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "scored");
    assert_eq!(body["classification"], "green");
    assert_eq!(body["routing_rationale"], "auto-approved");
}
