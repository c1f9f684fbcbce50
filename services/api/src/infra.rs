use dealdesk::workflows::scoring::{
    AlertError, ApprovalAlert, ApprovalPublisher, AttributeCatalog, AttributeCategory,
    AttributeId, CatalogViolation, DealId, DealRecord, DealRepository, RepositoryError,
    ScoringAttribute, ScoringThresholds,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDealRepository {
    records: Arc<Mutex<HashMap<DealId, DealRecord>>>,
}

impl DealRepository for InMemoryDealRepository {
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
pub(crate) struct InMemoryApprovalPublisher {
    events: Arc<Mutex<Vec<ApprovalAlert>>>,
}

impl ApprovalPublisher for InMemoryApprovalPublisher {
    fn publish(&self, alert: ApprovalAlert) -> Result<(), AlertError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryApprovalPublisher {
    pub(crate) fn events(&self) -> Vec<ApprovalAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

pub(crate) fn default_scoring_thresholds() -> ScoringThresholds {
    ScoringThresholds::new(70.0, 40.0, true)
}

#[allow(clippy::too_many_arguments)]
fn attribute(
    id: &str,
    name: &str,
    category: AttributeCategory,
    weight: f64,
    min_value: f64,
    max_value: f64,
    higher_is_better: bool,
    green_threshold: f64,
    yellow_threshold: f64,
    is_active: bool,
) -> ScoringAttribute {
    ScoringAttribute {
        id: AttributeId(id.to_string()),
        name: name.to_string(),
        category,
        weight,
        min_value,
        max_value,
        higher_is_better,
        green_threshold,
        yellow_threshold,
        is_active,
    }
}

/// Stock rubric used until an administrator replaces it: financial factors dominate,
/// with strategic, risk, and customer factors rounding out the picture.
pub(crate) fn default_attribute_catalog() -> Result<AttributeCatalog, CatalogViolation> {
    AttributeCatalog::new(vec![
        attribute(
            "discount_percent",
            "Discount off list",
            AttributeCategory::Financial,
            3.0,
            0.0,
            40.0,
            false,
            75.0,
            50.0,
            true,
        ),
        attribute(
            "gross_margin_percent",
            "Gross margin",
            AttributeCategory::Financial,
            2.5,
            0.0,
            80.0,
            true,
            70.0,
            40.0,
            true,
        ),
        attribute(
            "strategic_fit",
            "Strategic fit",
            AttributeCategory::Strategic,
            2.0,
            0.0,
            10.0,
            true,
            70.0,
            40.0,
            true,
        ),
        attribute(
            "payment_terms_days",
            "Payment terms",
            AttributeCategory::Risk,
            1.5,
            0.0,
            120.0,
            false,
            80.0,
            50.0,
            true,
        ),
        attribute(
            "contract_risk_rating",
            "Contract risk rating",
            AttributeCategory::Risk,
            1.0,
            1.0,
            5.0,
            false,
            75.0,
            50.0,
            true,
        ),
        attribute(
            "customer_health_index",
            "Customer health",
            AttributeCategory::Customer,
            2.0,
            0.0,
            100.0,
            true,
            70.0,
            40.0,
            true,
        ),
        attribute(
            "executive_sponsor_engaged",
            "Executive sponsor engaged",
            AttributeCategory::Customer,
            1.0,
            0.0,
            1.0,
            true,
            70.0,
            40.0,
            false,
        ),
    ])
}

pub(crate) fn parse_percent(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("'{raw}' must be between 0 and 100"))
    }
}
