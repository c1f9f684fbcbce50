mod config;
mod policy;
mod rules;

pub use config::ScoringThresholds;
pub use policy::ApprovalRoute;
pub use rules::normalize;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::scoring::domain::{
    AttributeCategory, AttributeId, Classification, DealScore, ScoringAttribute,
};

/// Stateless calculator applying the tenant thresholds to one deal's measurements.
///
/// Given the same attributes, scores, and thresholds it always produces the same
/// outcome; nothing it reads is mutated.
pub struct ScoringEngine {
    thresholds: ScoringThresholds,
}

impl ScoringEngine {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn score(
        &self,
        attributes: &[ScoringAttribute],
        scores: &BTreeMap<AttributeId, DealScore>,
    ) -> Result<ScoringOutcome, ScoringError> {
        let tally = rules::score_deal(attributes, scores)?;

        let classification = policy::classify(tally.total_score, &self.thresholds);
        let fully_scored =
            tally.signals.scorable > 0 && tally.signals.scored == tally.signals.scorable;
        let route = policy::decide_route(
            classification,
            &self.thresholds,
            fully_scored,
            &tally.signals.weak_attributes,
        );

        Ok(ScoringOutcome {
            total_score: tally.total_score,
            classification,
            route,
            approval_probability: policy::approval_probability(tally.total_score),
            fully_scored,
            category_breakdown: tally.category_breakdown,
            components: tally.components,
            rejected: tally.rejected,
        })
    }
}

/// Conditions under which no meaningful total exists. Callers must treat either as
/// "not yet scored", never as a red classification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("no active scoring attributes are configured")]
    NoActiveAttributes,
    #[error("none of the active attributes has a submitted score")]
    NoScoresProvided,
}

/// Full result of a calculate pass. `total_score` and `classification` travel as one
/// value so a caller can never observe one without the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub total_score: f64,
    pub classification: Classification,
    pub route: ApprovalRoute,
    pub approval_probability: f64,
    pub fully_scored: bool,
    pub category_breakdown: Vec<CategoryScore>,
    pub components: Vec<ScoreComponent>,
    pub rejected: Vec<RejectedAttribute>,
}

/// Per-attribute contribution, kept for transparent scorecard audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub attribute_id: AttributeId,
    pub name: String,
    pub category: AttributeCategory,
    pub weight: f64,
    pub raw_value: f64,
    pub normalized_score: f64,
    pub band: Classification,
}

/// Read-only per-category roll-up using the same weighted-mean rule as the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: AttributeCategory,
    pub score: f64,
    pub weight: f64,
}

/// Attribute excluded from the weighted mean, surfaced rather than silently skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedAttribute {
    pub attribute_id: AttributeId,
    pub name: String,
    pub defect: AttributeDefect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttributeDefect {
    InvalidRange { min_value: f64, max_value: f64 },
    NonPositiveWeight { weight: f64 },
}
