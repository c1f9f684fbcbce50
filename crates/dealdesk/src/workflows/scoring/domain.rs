use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for deals tracked by the scoring desk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Identifier wrapper for administrator-defined scoring attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(pub String);

/// Closed set of rubric categories. Kept as an enum so category labels cannot drift
/// between the admin surface and the scorecard roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Financial,
    Strategic,
    Risk,
    Customer,
}

impl AttributeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            AttributeCategory::Financial => "financial",
            AttributeCategory::Strategic => "strategic",
            AttributeCategory::Risk => "risk",
            AttributeCategory::Customer => "customer",
        }
    }
}

/// Administrator-defined, weighted scoring criterion. Immutable during a scoring pass.
///
/// `weight` expresses relative importance; the roll-up divides by the summed weights,
/// so the total stays on the 0-100 scale however many attributes are active.
/// `green_threshold` and `yellow_threshold` band a single normalized score for display
/// only; the deal-level classification uses the tenant-wide
/// [`super::engine::ScoringThresholds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringAttribute {
    pub id: AttributeId,
    pub name: String,
    pub category: AttributeCategory,
    pub weight: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub higher_is_better: bool,
    pub green_threshold: f64,
    pub yellow_threshold: f64,
    pub is_active: bool,
}

impl ScoringAttribute {
    /// Display band for one normalized score against this attribute's own thresholds.
    pub fn band(&self, normalized_score: f64) -> Classification {
        if normalized_score >= self.green_threshold {
            Classification::Green
        } else if normalized_score >= self.yellow_threshold {
            Classification::Yellow
        } else {
            Classification::Red
        }
    }
}

/// Raw measurement captured for one (deal, attribute) pair. Upserted on re-scoring,
/// never deleted while the deal is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealScore {
    pub attribute_id: AttributeId,
    pub raw_value: f64,
    pub normalized_score: f64,
    pub scored_by: String,
    pub scored_at: DateTime<Utc>,
}

/// Sales opportunity being scored and routed for approval.
///
/// `total_score` and `classification` are derived fields owned by the scoring engine;
/// they are only ever written together, by a calculate pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub name: String,
    pub account: String,
    pub amount_usd: u64,
    pub total_score: Option<f64>,
    pub classification: Option<Classification>,
}

/// Three-tier outcome derived from the weighted total, driving approval routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Green,
    Yellow,
    Red,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Classification::Green => "green",
            Classification::Yellow => "yellow",
            Classification::Red => "red",
        }
    }
}

/// Where a deal sits in its scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealScoringStatus {
    Unscored,
    InProgress,
    Scored,
}

impl DealScoringStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DealScoringStatus::Unscored => "unscored",
            DealScoringStatus::InProgress => "in_progress",
            DealScoringStatus::Scored => "scored",
        }
    }
}

/// Payload registering a deal with the desk ahead of scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeal {
    pub name: String,
    pub account: String,
    pub amount_usd: u64,
}

/// One scorer-submitted raw value for an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub attribute_id: AttributeId,
    pub raw_value: f64,
    pub scored_by: String,
}

/// Hypothetical raw value layered over stored scores during what-if simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub attribute_id: AttributeId,
    pub raw_value: f64,
}
