use crate::cli::ServeArgs;
use crate::infra::{
    default_attribute_catalog, AppState, InMemoryApprovalPublisher, InMemoryDealRepository,
};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dealdesk::config::AppConfig;
use dealdesk::error::AppError;
use dealdesk::telemetry;
use dealdesk::workflows::scoring::{DealScoringError, DealScoringService, ScoringThresholds};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryDealRepository::default());
    let approvals = Arc::new(InMemoryApprovalPublisher::default());
    let catalog = default_attribute_catalog().map_err(DealScoringError::from)?;
    let thresholds = ScoringThresholds::new(
        config.scoring.green_min,
        config.scoring.yellow_min,
        config.scoring.auto_approve_green,
    );
    let scoring_service = Arc::new(DealScoringService::new(
        repository,
        approvals,
        catalog,
        thresholds,
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "deal scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
