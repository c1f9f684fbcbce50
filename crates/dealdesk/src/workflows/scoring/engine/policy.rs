use serde::{Deserialize, Serialize};

use super::config::ScoringThresholds;
use crate::workflows::scoring::domain::Classification;

/// Routing decision handed to the downstream approval workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApprovalRoute {
    AutoApproved,
    DealDeskReview,
    ManagerReview { reasons: Vec<String> },
    ExceptionReview { reasons: Vec<String> },
}

impl ApprovalRoute {
    pub fn summary(&self) -> String {
        match self {
            ApprovalRoute::AutoApproved => "auto-approved".to_string(),
            ApprovalRoute::DealDeskReview => "routed to deal desk review".to_string(),
            ApprovalRoute::ManagerReview { reasons } => {
                if reasons.is_empty() {
                    "routed to manager review".to_string()
                } else {
                    format!("routed to manager review: {}", reasons.join("; "))
                }
            }
            ApprovalRoute::ExceptionReview { reasons } => {
                if reasons.is_empty() {
                    "routed to exception approval".to_string()
                } else {
                    format!("routed to exception approval: {}", reasons.join("; "))
                }
            }
        }
    }
}

/// Band edges are inclusive on the lower side: a total exactly at `green_min` is green.
pub(crate) fn classify(total_score: f64, thresholds: &ScoringThresholds) -> Classification {
    if total_score >= thresholds.green_min {
        Classification::Green
    } else if total_score >= thresholds.yellow_min {
        Classification::Yellow
    } else {
        Classification::Red
    }
}

pub(crate) fn decide_route(
    classification: Classification,
    thresholds: &ScoringThresholds,
    fully_scored: bool,
    weak_attributes: &[String],
) -> ApprovalRoute {
    let mut reasons: Vec<String> = weak_attributes
        .iter()
        .map(|name| format!("{name} scored in the red band"))
        .collect();
    if !fully_scored {
        reasons.push("provisional score: not every active attribute is scored".to_string());
    }

    match classification {
        // A provisional score must never auto-approve, whatever the flag says.
        Classification::Green if thresholds.auto_approve_green && fully_scored => {
            ApprovalRoute::AutoApproved
        }
        Classification::Green => ApprovalRoute::DealDeskReview,
        Classification::Yellow => ApprovalRoute::ManagerReview { reasons },
        Classification::Red => ApprovalRoute::ExceptionReview { reasons },
    }
}

/// Presentation affordance shown next to the scorecard, not a statistical model.
pub(crate) fn approval_probability(total_score: f64) -> f64 {
    (total_score * 1.2).clamp(0.0, 100.0)
}
