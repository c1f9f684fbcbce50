use crate::infra::{
    default_attribute_catalog, default_scoring_thresholds, parse_percent,
    InMemoryApprovalPublisher, InMemoryDealRepository,
};
use clap::Args;
use dealdesk::error::AppError;
use dealdesk::workflows::crm::CrmScoreImporter;
use dealdesk::workflows::scoring::{
    AttributeId, Deal, DealRepository, DealScoringError, DealScoringService, NewDeal,
    ScoreSubmission, ScoringOutcome, ScoringThresholds,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// Optional CRM scorecard export (CSV) supplying the raw values
    #[arg(long)]
    pub(crate) crm_csv: Option<PathBuf>,
    /// Override the green classification boundary (0-100)
    #[arg(long, value_parser = parse_percent)]
    pub(crate) green_min: Option<f64>,
    /// Override the yellow classification boundary (0-100)
    #[arg(long, value_parser = parse_percent)]
    pub(crate) yellow_min: Option<f64>,
    /// Allow green deals with full coverage to auto-approve
    #[arg(long)]
    pub(crate) auto_approve_green: bool,
    /// Include the per-attribute component listing in the output
    #[arg(long)]
    pub(crate) list_components: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional CRM scorecard export (CSV) supplying the raw values
    #[arg(long)]
    pub(crate) crm_csv: Option<PathBuf>,
    /// Include the per-attribute component listing in the output
    #[arg(long)]
    pub(crate) list_components: bool,
}

fn sample_deal() -> NewDeal {
    NewDeal {
        name: "Northwind platform renewal".to_string(),
        account: "Northwind Traders".to_string(),
        amount_usd: 420_000,
    }
}

fn sample_measurements() -> Vec<(&'static str, f64)> {
    vec![
        ("discount_percent", 12.0),
        ("gross_margin_percent", 62.0),
        ("strategic_fit", 8.0),
        ("payment_terms_days", 45.0),
        ("contract_risk_rating", 2.0),
        ("customer_health_index", 78.0),
    ]
}

fn build_service(
    thresholds: ScoringThresholds,
) -> Result<
    (
        DealScoringService<InMemoryDealRepository, InMemoryApprovalPublisher>,
        Arc<InMemoryDealRepository>,
        Arc<InMemoryApprovalPublisher>,
    ),
    AppError,
> {
    let repository = Arc::new(InMemoryDealRepository::default());
    let approvals = Arc::new(InMemoryApprovalPublisher::default());
    let catalog = default_attribute_catalog().map_err(DealScoringError::from)?;
    let service = DealScoringService::new(repository.clone(), approvals.clone(), catalog, thresholds);
    Ok((service, repository, approvals))
}

fn seed_scores(
    service: &DealScoringService<InMemoryDealRepository, InMemoryApprovalPublisher>,
    deal_id: &dealdesk::workflows::scoring::DealId,
    crm_csv: Option<PathBuf>,
) -> Result<(), AppError> {
    match crm_csv {
        Some(path) => {
            let summary = CrmScoreImporter::from_path(path, service, deal_id)?;
            println!(
                "Imported {} measurement(s) from the CRM export",
                summary.applied
            );
            if !summary.skipped.is_empty() {
                println!("Skipped unknown attribute keys: {}", summary.skipped.join(", "));
            }
        }
        None => {
            for (attribute_id, raw_value) in sample_measurements() {
                service.submit_score(
                    deal_id,
                    ScoreSubmission {
                        attribute_id: AttributeId(attribute_id.to_string()),
                        raw_value,
                        scored_by: "demo".to_string(),
                    },
                )?;
            }
            println!("Submitted sample measurements for every active attribute");
        }
    }
    Ok(())
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let ScoreReportArgs {
        crm_csv,
        green_min,
        yellow_min,
        auto_approve_green,
        list_components,
    } = args;

    let defaults = default_scoring_thresholds();
    let thresholds = ScoringThresholds::new(
        green_min.unwrap_or(defaults.green_min),
        yellow_min.unwrap_or(defaults.yellow_min),
        auto_approve_green,
    );

    let (service, _, _) = build_service(thresholds)?;
    let record = service.create(sample_deal())?;
    seed_scores(&service, &record.deal.id, crm_csv)?;
    let outcome = service.calculate(&record.deal.id)?;

    render_scorecard(&record.deal, &outcome, list_components);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        crm_csv,
        list_components,
    } = args;

    println!("Deal desk demo");

    let (service, repository, approvals) = build_service(default_scoring_thresholds())?;
    let record = service.create(sample_deal())?;
    println!(
        "Registered {} for {} (${})",
        record.deal.id.0, record.deal.account, record.deal.amount_usd
    );

    seed_scores(&service, &record.deal.id, crm_csv)?;
    let outcome = service.calculate(&record.deal.id)?;
    render_scorecard(&record.deal, &outcome, list_components);

    let alerts = approvals.events();
    if alerts.is_empty() {
        println!("\nApproval alerts: none");
    } else {
        println!("\nApproval alerts");
        for alert in &alerts {
            println!("- {} for {}", alert.template, alert.deal_id.0);
        }
    }

    let backlog = repository.unscored(10).map_err(DealScoringError::from)?;
    println!("\nDeals awaiting calculation: {}", backlog.len());

    Ok(())
}

fn render_scorecard(deal: &Deal, outcome: &ScoringOutcome, list_components: bool) {
    println!("\nDeal scorecard");
    println!("Deal: {} ({})", deal.name, deal.account);
    println!(
        "Total score: {:.1} -> {}",
        outcome.total_score,
        outcome.classification.label()
    );
    println!(
        "Approval probability: {:.0}%",
        outcome.approval_probability
    );
    println!("Routing: {}", outcome.route.summary());
    if outcome.fully_scored {
        println!("Coverage: all active attributes scored");
    } else {
        println!("Coverage: partial (provisional score)");
    }

    println!("\nCategory breakdown");
    for entry in &outcome.category_breakdown {
        println!(
            "- {}: {:.1} (weight {:.1})",
            entry.category.label(),
            entry.score,
            entry.weight
        );
    }

    if !outcome.rejected.is_empty() {
        println!("\nAttributes excluded from the total");
        for rejected in &outcome.rejected {
            println!("- {} ({:?})", rejected.name, rejected.defect);
        }
    }

    if list_components {
        println!("\nComponent listing");
        for component in &outcome.components {
            println!(
                "- {} | {} | raw {:.1} -> {:.1} | weight {:.1} | {}",
                component.attribute_id.0,
                component.category.label(),
                component.raw_value,
                component.normalized_score,
                component.weight,
                component.band.label()
            );
        }
    }
}
