use serde::{Deserialize, Serialize};

const DEFAULT_GREEN_MIN: f64 = 70.0;
const DEFAULT_YELLOW_MIN: f64 = 40.0;

/// Tenant-wide classification boundaries. A single record governs every deal;
/// it is passed explicitly into each computation rather than read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub green_min: f64,
    pub yellow_min: f64,
    pub auto_approve_green: bool,
}

impl ScoringThresholds {
    /// Build thresholds, falling back to the stock bands when the inputs are
    /// non-finite, outside 0-100, or misordered.
    pub fn new(green_min: f64, yellow_min: f64, auto_approve_green: bool) -> Self {
        let ordered = green_min.is_finite()
            && yellow_min.is_finite()
            && (0.0..=100.0).contains(&green_min)
            && (0.0..=100.0).contains(&yellow_min)
            && yellow_min <= green_min;

        if ordered {
            Self {
                green_min,
                yellow_min,
                auto_approve_green,
            }
        } else {
            Self {
                green_min: DEFAULT_GREEN_MIN,
                yellow_min: DEFAULT_YELLOW_MIN,
                auto_approve_green,
            }
        }
    }
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_GREEN_MIN, DEFAULT_YELLOW_MIN, false)
    }
}
