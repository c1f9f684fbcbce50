use std::collections::BTreeMap;

use super::{
    AttributeDefect, CategoryScore, RejectedAttribute, ScoreComponent, ScoringError,
};
use crate::workflows::scoring::domain::{
    AttributeCategory, AttributeId, Classification, DealScore, ScoringAttribute,
};

/// Rescale a raw measurement onto the common 0-100 scale.
///
/// Values outside `[min_value, max_value]` are clamped first, so the result is in
/// `[0, 100]` by construction. When `higher_is_better` is false the direction is
/// inverted: the minimum maps to 100 and the maximum to 0. Collapsed bounds
/// (`min_value >= max_value`) return 100, treating the attribute as fully satisfied;
/// the attribute catalog refuses such attributes so totals never see this branch.
pub fn normalize(attribute: &ScoringAttribute, raw_value: f64) -> f64 {
    let min = attribute.min_value;
    let max = attribute.max_value;

    if min >= max {
        return 100.0;
    }

    let clamped = raw_value.max(min).min(max);
    let fraction = (clamped - min) / (max - min) * 100.0;

    if attribute.higher_is_better {
        fraction
    } else {
        100.0 - fraction
    }
}

pub(crate) struct ScoreSignals {
    pub(crate) scored: usize,
    pub(crate) scorable: usize,
    pub(crate) weak_attributes: Vec<String>,
}

pub(crate) struct Tally {
    pub(crate) total_score: f64,
    pub(crate) components: Vec<ScoreComponent>,
    pub(crate) category_breakdown: Vec<CategoryScore>,
    pub(crate) rejected: Vec<RejectedAttribute>,
    pub(crate) signals: ScoreSignals,
}

fn defect_for(attribute: &ScoringAttribute) -> Option<AttributeDefect> {
    if attribute.min_value >= attribute.max_value {
        return Some(AttributeDefect::InvalidRange {
            min_value: attribute.min_value,
            max_value: attribute.max_value,
        });
    }
    if !(attribute.weight > 0.0) {
        return Some(AttributeDefect::NonPositiveWeight {
            weight: attribute.weight,
        });
    }
    None
}

/// Weighted roll-up over one deal's measurements.
///
/// Attributes with a defective definition are excluded from the mean and reported;
/// silently dropping them would change the effective weight denominator without a
/// trace. Partial coverage yields a provisional total over the scored attributes.
pub(crate) fn score_deal(
    attributes: &[ScoringAttribute],
    scores: &BTreeMap<AttributeId, DealScore>,
) -> Result<Tally, ScoringError> {
    let active: Vec<&ScoringAttribute> =
        attributes.iter().filter(|attr| attr.is_active).collect();
    if active.is_empty() {
        return Err(ScoringError::NoActiveAttributes);
    }

    let mut components = Vec::new();
    let mut rejected = Vec::new();
    let mut weak_attributes = Vec::new();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut by_category: BTreeMap<AttributeCategory, (f64, f64)> = BTreeMap::new();
    let mut scorable = 0usize;

    for attribute in active {
        if let Some(defect) = defect_for(attribute) {
            rejected.push(RejectedAttribute {
                attribute_id: attribute.id.clone(),
                name: attribute.name.clone(),
                defect,
            });
            continue;
        }

        scorable += 1;
        let Some(score) = scores.get(&attribute.id) else {
            continue;
        };

        // Re-derive the normalized score from the raw value so the roll-up is a pure
        // function of (attributes, raw measurements).
        let normalized_score = normalize(attribute, score.raw_value);
        let band = attribute.band(normalized_score);
        if band == Classification::Red {
            weak_attributes.push(attribute.name.clone());
        }

        numerator += normalized_score * attribute.weight;
        denominator += attribute.weight;
        let entry = by_category.entry(attribute.category).or_insert((0.0, 0.0));
        entry.0 += normalized_score * attribute.weight;
        entry.1 += attribute.weight;

        components.push(ScoreComponent {
            attribute_id: attribute.id.clone(),
            name: attribute.name.clone(),
            category: attribute.category,
            weight: attribute.weight,
            raw_value: score.raw_value,
            normalized_score,
            band,
        });
    }

    if denominator <= 0.0 {
        return Err(ScoringError::NoScoresProvided);
    }

    let category_breakdown = by_category
        .into_iter()
        .map(|(category, (num, den))| CategoryScore {
            category,
            score: num / den,
            weight: den,
        })
        .collect();

    Ok(Tally {
        total_score: numerator / denominator,
        category_breakdown,
        signals: ScoreSignals {
            scored: components.len(),
            scorable,
            weak_attributes,
        },
        components,
        rejected,
    })
}
