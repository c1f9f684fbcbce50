use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::scoring::catalog::AttributeCatalog;
use crate::workflows::scoring::domain::{
    AttributeCategory, AttributeId, DealId, DealScore, NewDeal, ScoreSubmission, ScoringAttribute,
};
use crate::workflows::scoring::engine::{normalize, ScoringEngine, ScoringThresholds};
use crate::workflows::scoring::repository::{
    AlertError, ApprovalAlert, ApprovalPublisher, DealRecord, DealRepository, RepositoryError,
};
use crate::workflows::scoring::router::scoring_router;
use crate::workflows::scoring::service::DealScoringService;

pub(super) fn attribute(
    id: &str,
    name: &str,
    category: AttributeCategory,
    weight: f64,
    min_value: f64,
    max_value: f64,
    higher_is_better: bool,
) -> ScoringAttribute {
    ScoringAttribute {
        id: AttributeId(id.to_string()),
        name: name.to_string(),
        category,
        weight,
        min_value,
        max_value,
        higher_is_better,
        green_threshold: 70.0,
        yellow_threshold: 40.0,
        is_active: true,
    }
}

/// Two-attribute rubric used across the engine scenarios: a dominant margin factor
/// and a lighter, inverted discount factor.
pub(super) fn rubric() -> Vec<ScoringAttribute> {
    vec![
        attribute(
            "gross_margin_percent",
            "Gross margin",
            AttributeCategory::Financial,
            2.0,
            0.0,
            100.0,
            true,
        ),
        attribute(
            "discount_percent",
            "Discount",
            AttributeCategory::Risk,
            1.0,
            0.0,
            50.0,
            false,
        ),
    ]
}

pub(super) fn thresholds() -> ScoringThresholds {
    ScoringThresholds::new(70.0, 40.0, true)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(thresholds())
}

pub(super) fn deal_score(attribute: &ScoringAttribute, raw_value: f64) -> DealScore {
    DealScore {
        attribute_id: attribute.id.clone(),
        raw_value,
        normalized_score: normalize(attribute, raw_value),
        scored_by: "desk-analyst".to_string(),
        scored_at: Utc::now(),
    }
}

/// Build a score map for the given `(attribute id, raw value)` pairs, resolving each
/// id against `attributes`.
pub(super) fn score_map(
    attributes: &[ScoringAttribute],
    raws: &[(&str, f64)],
) -> BTreeMap<AttributeId, DealScore> {
    let mut scores = BTreeMap::new();
    for (id, raw) in raws {
        let attribute = attributes
            .iter()
            .find(|attr| attr.id.0 == *id)
            .expect("fixture attribute exists");
        scores.insert(attribute.id.clone(), deal_score(attribute, *raw));
    }
    scores
}

pub(super) fn catalog() -> AttributeCatalog {
    let mut attributes = rubric();
    let mut dormant = attribute(
        "executive_sponsor",
        "Executive sponsor engaged",
        AttributeCategory::Customer,
        1.0,
        0.0,
        1.0,
        true,
    );
    dormant.is_active = false;
    attributes.push(dormant);
    AttributeCatalog::new(attributes).expect("fixture catalog is valid")
}

pub(super) fn new_deal() -> NewDeal {
    NewDeal {
        name: "Acme renewal FY26".to_string(),
        account: "Acme Corp".to_string(),
        amount_usd: 240_000,
    }
}

pub(super) fn submission(attribute_id: &str, raw_value: f64) -> ScoreSubmission {
    ScoreSubmission {
        attribute_id: AttributeId(attribute_id.to_string()),
        raw_value,
        scored_by: "desk-analyst".to_string(),
    }
}

pub(super) fn build_service() -> (
    DealScoringService<MemoryRepository, MemoryApprovals>,
    Arc<MemoryRepository>,
    Arc<MemoryApprovals>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let approvals = Arc::new(MemoryApprovals::default());
    let service = DealScoringService::new(
        repository.clone(),
        approvals.clone(),
        catalog(),
        thresholds(),
    );
    (service, repository, approvals)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<DealId, DealRecord>>>,
}

impl DealRepository for MemoryRepository {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.deal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.deal.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&record.deal.id)
            .ok_or(RepositoryError::NotFound)?;
        let expected = stored.version + 1;
        if record.version != expected {
            return Err(RepositoryError::StaleVersion {
                expected,
                found: record.version,
            });
        }
        guard.insert(record.deal.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn unscored(&self, limit: usize) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.deal.total_score.is_none())
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApprovals {
    events: Arc<Mutex<Vec<ApprovalAlert>>>,
}

impl MemoryApprovals {
    pub(super) fn events(&self) -> Vec<ApprovalAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl ApprovalPublisher for MemoryApprovals {
    fn publish(&self, alert: ApprovalAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl DealRepository for UnavailableRepository {
    fn insert(&self, _record: DealRecord) -> Result<DealRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: DealRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn unscored(&self, _limit: usize) -> Result<Vec<DealRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn scoring_router_with_service(
    service: DealScoringService<MemoryRepository, MemoryApprovals>,
) -> axum::Router {
    scoring_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
