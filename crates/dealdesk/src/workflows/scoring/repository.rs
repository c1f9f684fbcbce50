use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AttributeId, Deal, DealId, DealScore, DealScoringStatus};
use super::engine::ScoringOutcome;

/// Versioned record persisted for each deal under scoring. The version supports an
/// optimistic concurrency check: writers bump it and the store rejects stale bumps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal: Deal,
    pub status: DealScoringStatus,
    pub scores: BTreeMap<AttributeId, DealScore>,
    pub outcome: Option<ScoringOutcome>,
    pub version: u64,
}

impl DealRecord {
    pub fn routing_rationale(&self) -> String {
        match &self.outcome {
            Some(outcome) => outcome.route.summary(),
            None => "pending calculation".to_string(),
        }
    }

    pub fn status_view(&self) -> DealStatusView {
        DealStatusView {
            deal_id: self.deal.id.clone(),
            status: self.status.label(),
            routing_rationale: self.routing_rationale(),
            total_score: self.deal.total_score,
            classification: self.deal.classification.map(|c| c.label()),
            fully_scored: self.outcome.as_ref().map(|outcome| outcome.fully_scored),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DealRepository: Send + Sync {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError>;
    /// Persist an updated record. The caller presents the record with its version
    /// already bumped; anything other than stored version + 1 is a stale write.
    fn update(&self, record: DealRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError>;
    fn unscored(&self, limit: usize) -> Result<Vec<DealRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("stale record version (expected {expected}, found {found})")]
    StaleVersion { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notifying the approval workflow (e.g. a CRM or e-mail adapter).
pub trait ApprovalPublisher: Send + Sync {
    fn publish(&self, alert: ApprovalAlert) -> Result<(), AlertError>;
}

/// Alert payload so routes/tests can assert the integration boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalAlert {
    pub template: String,
    pub deal_id: DealId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a deal's exposed scoring status.
#[derive(Debug, Clone, Serialize)]
pub struct DealStatusView {
    pub deal_id: DealId,
    pub status: &'static str,
    pub routing_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_scored: Option<bool>,
}
