use crate::cli::ServeArgs;
use crate::infra::{seed_providers, AppState, InMemoryProviderSource};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use provider_intel::config::AppConfig;
use provider_intel::error::AppError;
use provider_intel::scoring::ScoringService;
use provider_intel::telemetry;
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

    let source = Arc::new(InMemoryProviderSource::with_records(seed_providers()));
    let scoring_service = Arc::new(ScoringService::new(source).map_err(|err| {
        AppError::Scoring(provider_intel::scoring::ScoringServiceError::Config(err))
    })?);

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "provider scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
