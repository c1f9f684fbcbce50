use std::collections::BTreeSet;

use super::domain::{AttributeId, ScoringAttribute};

/// Validation errors raised when an administrator-supplied attribute set is admitted.
#[derive(Debug, thiserror::Error)]
pub enum CatalogViolation {
    #[error("attribute {id} has an empty value range (min {min} >= max {max})")]
    InvalidRange { id: String, min: f64, max: f64 },
    #[error("attribute {id} has a non-positive weight ({weight})")]
    NonPositiveWeight { id: String, weight: f64 },
    #[error("attribute {id} has misordered display bands (yellow {yellow}, green {green})")]
    MisorderedBands { id: String, yellow: f64, green: f64 },
    #[error("duplicate attribute id {id}")]
    DuplicateId { id: String },
    #[error("attribute set contains no active attributes")]
    Empty,
}

/// Admission guard for the scoring rubric.
///
/// Attributes are validated once, up front, so every scoring pass works from a set
/// whose invariants hold: distinct bounds, positive weights, ordered display bands.
/// Inactive attributes are dropped at admission; they never participate in a pass.
#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    active: Vec<ScoringAttribute>,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<ScoringAttribute>) -> Result<Self, CatalogViolation> {
        let mut seen: BTreeSet<AttributeId> = BTreeSet::new();
        for attribute in &attributes {
            if !seen.insert(attribute.id.clone()) {
                return Err(CatalogViolation::DuplicateId {
                    id: attribute.id.0.clone(),
                });
            }
        }

        let active: Vec<ScoringAttribute> = attributes
            .into_iter()
            .filter(|attribute| attribute.is_active)
            .collect();

        for attribute in &active {
            validate(attribute)?;
        }

        if active.is_empty() {
            return Err(CatalogViolation::Empty);
        }

        Ok(Self { active })
    }

    /// Active attributes, in admission order.
    pub fn active(&self) -> &[ScoringAttribute] {
        &self.active
    }

    /// Resolve an id to an active attribute; unknown and inactive ids both miss.
    pub fn find(&self, id: &AttributeId) -> Option<&ScoringAttribute> {
        self.active.iter().find(|attribute| &attribute.id == id)
    }
}

fn validate(attribute: &ScoringAttribute) -> Result<(), CatalogViolation> {
    if attribute.min_value >= attribute.max_value {
        return Err(CatalogViolation::InvalidRange {
            id: attribute.id.0.clone(),
            min: attribute.min_value,
            max: attribute.max_value,
        });
    }

    if !(attribute.weight > 0.0) || !attribute.weight.is_finite() {
        return Err(CatalogViolation::NonPositiveWeight {
            id: attribute.id.0.clone(),
            weight: attribute.weight,
        });
    }

    let bands_ordered = (0.0..=100.0).contains(&attribute.yellow_threshold)
        && (0.0..=100.0).contains(&attribute.green_threshold)
        && attribute.yellow_threshold <= attribute.green_threshold;
    if !bands_ordered {
        return Err(CatalogViolation::MisorderedBands {
            id: attribute.id.0.clone(),
            yellow: attribute.yellow_threshold,
            green: attribute.green_threshold,
        });
    }

    Ok(())
}
