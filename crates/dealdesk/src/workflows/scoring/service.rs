use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::catalog::{AttributeCatalog, CatalogViolation};
use super::domain::{
    Deal, DealId, DealScore, DealScoringStatus, NewDeal, ScoreOverride, ScoreSubmission,
};
use super::engine::{ApprovalRoute, ScoringEngine, ScoringError, ScoringOutcome, ScoringThresholds};
use super::repository::{
    AlertError, ApprovalAlert, ApprovalPublisher, DealRecord, DealRepository, RepositoryError,
};

/// Service composing the attribute catalog, scoring engine, repository, and
/// approval publisher.
pub struct DealScoringService<R, P> {
    catalog: Arc<AttributeCatalog>,
    repository: Arc<R>,
    approvals: Arc<P>,
    engine: Arc<ScoringEngine>,
}

static DEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_deal_id() -> DealId {
    let id = DEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DealId(format!("deal-{id:06}"))
}

impl<R, P> DealScoringService<R, P>
where
    R: DealRepository + 'static,
    P: ApprovalPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        approvals: Arc<P>,
        catalog: AttributeCatalog,
        thresholds: ScoringThresholds,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            repository,
            approvals,
            engine: Arc::new(ScoringEngine::new(thresholds)),
        }
    }

    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// Register a new deal with the desk, ahead of any scoring.
    pub fn create(&self, new_deal: NewDeal) -> Result<DealRecord, DealScoringError> {
        let record = DealRecord {
            deal: Deal {
                id: next_deal_id(),
                name: new_deal.name,
                account: new_deal.account,
                amount_usd: new_deal.amount_usd,
                total_score: None,
                classification: None,
            },
            status: DealScoringStatus::Unscored,
            scores: BTreeMap::new(),
            outcome: None,
            version: 1,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Record one raw measurement, normalizing it immediately. Re-submitting for the
    /// same attribute replaces the prior measurement.
    pub fn submit_score(
        &self,
        deal_id: &DealId,
        submission: ScoreSubmission,
    ) -> Result<DealScore, DealScoringError> {
        let mut record = self
            .repository
            .fetch(deal_id)?
            .ok_or(RepositoryError::NotFound)?;

        let attribute = self
            .catalog
            .find(&submission.attribute_id)
            .ok_or_else(|| DealScoringError::UnknownAttribute(submission.attribute_id.0.clone()))?;

        let score = DealScore {
            attribute_id: attribute.id.clone(),
            raw_value: submission.raw_value,
            normalized_score: super::engine::normalize(attribute, submission.raw_value),
            scored_by: submission.scored_by,
            scored_at: Utc::now(),
        };

        record.scores.insert(attribute.id.clone(), score.clone());
        if record.status == DealScoringStatus::Unscored {
            record.status = DealScoringStatus::InProgress;
        }
        record.version += 1;
        self.repository.update(record)?;

        Ok(score)
    }

    /// Run the engine and persist the derived pair. A failed pass leaves the stored
    /// total and classification untouched.
    pub fn calculate(&self, deal_id: &DealId) -> Result<ScoringOutcome, DealScoringError> {
        let mut record = self
            .repository
            .fetch(deal_id)?
            .ok_or(RepositoryError::NotFound)?;

        let outcome = self.engine.score(self.catalog.active(), &record.scores)?;

        // The derived pair moves together; there is no path that writes one field.
        record.deal.total_score = Some(outcome.total_score);
        record.deal.classification = Some(outcome.classification);
        record.status = DealScoringStatus::Scored;
        record.outcome = Some(outcome.clone());
        record.version += 1;
        self.repository.update(record)?;

        if matches!(outcome.route, ApprovalRoute::AutoApproved) {
            let mut details = BTreeMap::new();
            details.insert(
                "total_score".to_string(),
                format!("{:.1}", outcome.total_score),
            );
            details.insert(
                "classification".to_string(),
                outcome.classification.label().to_string(),
            );
            self.approvals.publish(ApprovalAlert {
                template: "deal_auto_approved".to_string(),
                deal_id: deal_id.clone(),
                details,
            })?;
        }

        Ok(outcome)
    }

    /// What-if pass: hypothetical raw values layered over the stored measurements.
    /// Nothing is persisted and no alert fires.
    pub fn simulate(
        &self,
        deal_id: &DealId,
        overrides: &[ScoreOverride],
    ) -> Result<ScoringOutcome, DealScoringError> {
        let record = self
            .repository
            .fetch(deal_id)?
            .ok_or(RepositoryError::NotFound)?;

        let mut scores = record.scores;
        for hypothetical in overrides {
            let attribute = self.catalog.find(&hypothetical.attribute_id).ok_or_else(|| {
                DealScoringError::UnknownAttribute(hypothetical.attribute_id.0.clone())
            })?;
            scores.insert(
                attribute.id.clone(),
                DealScore {
                    attribute_id: attribute.id.clone(),
                    raw_value: hypothetical.raw_value,
                    normalized_score: super::engine::normalize(attribute, hypothetical.raw_value),
                    scored_by: "what-if".to_string(),
                    scored_at: Utc::now(),
                },
            );
        }

        Ok(self.engine.score(self.catalog.active(), &scores)?)
    }

    /// Fetch a deal record and current status for API responses.
    pub fn get(&self, deal_id: &DealId) -> Result<DealRecord, DealScoringError> {
        let record = self
            .repository
            .fetch(deal_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the deal scoring service.
#[derive(Debug, thiserror::Error)]
pub enum DealScoringError {
    #[error("unknown or inactive scoring attribute: {0}")]
    UnknownAttribute(String),
    #[error(transparent)]
    Catalog(#[from] CatalogViolation),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Approval(#[from] AlertError),
}
