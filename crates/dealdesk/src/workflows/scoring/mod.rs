//! Deal scoring, classification, and approval routing.
//!
//! The workflow converts scorer-submitted raw measurements into normalized 0-100
//! scores, rolls them up into a weighted total, classifies the deal green, yellow,
//! or red against tenant-wide thresholds, and decides the approval route. The
//! engine itself is a pure computation; persistence and alerting sit behind the
//! repository and publisher traits.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{AttributeCatalog, CatalogViolation};
pub use domain::{
    AttributeCategory, AttributeId, Classification, Deal, DealId, DealScore, DealScoringStatus,
    NewDeal, ScoreOverride, ScoreSubmission, ScoringAttribute,
};
pub use engine::{
    normalize, ApprovalRoute, AttributeDefect, CategoryScore, RejectedAttribute, ScoreComponent,
    ScoringEngine, ScoringError, ScoringOutcome, ScoringThresholds,
};
pub use repository::{
    AlertError, ApprovalAlert, ApprovalPublisher, DealRecord, DealRepository, DealStatusView,
    RepositoryError,
};
pub use router::scoring_router;
pub use service::{DealScoringError, DealScoringService};
