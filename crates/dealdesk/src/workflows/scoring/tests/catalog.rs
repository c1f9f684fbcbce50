use super::common::*;
use crate::workflows::scoring::catalog::{AttributeCatalog, CatalogViolation};
use crate::workflows::scoring::domain::{AttributeCategory, AttributeId};

#[test]
fn admits_a_valid_rubric() {
    let catalog = AttributeCatalog::new(rubric()).expect("rubric admits");

    assert_eq!(catalog.active().len(), 2);
    assert!(catalog
        .find(&AttributeId("gross_margin_percent".to_string()))
        .is_some());
}

#[test]
fn rejects_an_empty_set() {
    let error = AttributeCatalog::new(Vec::new()).expect_err("empty set rejected");

    assert!(matches!(error, CatalogViolation::Empty));
}

#[test]
fn rejects_a_set_with_no_active_attributes() {
    let mut attributes = rubric();
    for attribute in &mut attributes {
        attribute.is_active = false;
    }

    let error = AttributeCatalog::new(attributes).expect_err("all-inactive set rejected");

    assert!(matches!(error, CatalogViolation::Empty));
}

#[test]
fn rejects_an_empty_value_range() {
    let mut attributes = rubric();
    attributes.push(attribute(
        "flat",
        "Flat",
        AttributeCategory::Strategic,
        1.0,
        10.0,
        10.0,
        true,
    ));

    let error = AttributeCatalog::new(attributes).expect_err("collapsed range rejected");

    assert!(matches!(error, CatalogViolation::InvalidRange { .. }));
}

#[test]
fn rejects_a_non_positive_weight() {
    let mut attributes = rubric();
    attributes.push(attribute(
        "zero_weight",
        "Zero weight",
        AttributeCategory::Customer,
        0.0,
        0.0,
        10.0,
        true,
    ));

    let error = AttributeCatalog::new(attributes).expect_err("zero weight rejected");

    assert!(matches!(error, CatalogViolation::NonPositiveWeight { .. }));
}

#[test]
fn rejects_misordered_display_bands() {
    let mut attributes = rubric();
    let mut swapped = attribute(
        "swapped",
        "Swapped bands",
        AttributeCategory::Customer,
        1.0,
        0.0,
        10.0,
        true,
    );
    swapped.green_threshold = 30.0;
    swapped.yellow_threshold = 60.0;
    attributes.push(swapped);

    let error = AttributeCatalog::new(attributes).expect_err("misordered bands rejected");

    assert!(matches!(error, CatalogViolation::MisorderedBands { .. }));
}

#[test]
fn rejects_duplicate_ids() {
    let mut attributes = rubric();
    attributes.push(attributes[0].clone());

    let error = AttributeCatalog::new(attributes).expect_err("duplicate id rejected");

    assert!(matches!(error, CatalogViolation::DuplicateId { .. }));
}

#[test]
fn inactive_attributes_are_not_resolvable() {
    let catalog = catalog();

    assert!(catalog
        .find(&AttributeId("executive_sponsor".to_string()))
        .is_none());
}

#[test]
fn inactive_attributes_escape_validation() {
    let mut attributes = rubric();
    let mut dormant = attribute(
        "dormant_broken",
        "Dormant",
        AttributeCategory::Customer,
        0.0,
        5.0,
        5.0,
        true,
    );
    dormant.is_active = false;
    attributes.push(dormant);

    let catalog = AttributeCatalog::new(attributes).expect("inactive defects tolerated");

    assert_eq!(catalog.active().len(), 2);
}
