use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_advisory_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use invest_sim::clock::{Clock, SystemClock};
use invest_sim::config::AppConfig;
use invest_sim::error::AppError;
use invest_sim::telemetry;
use invest_sim::usage::UsageTracker;
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

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let advisory_service = Arc::new(build_service(
        config.catalog.seed_demo_data,
        clock.clone(),
    )?);
    let tracker = Arc::new(UsageTracker::new(clock));

    let app = with_advisory_routes(advisory_service, tracker)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = config.catalog.seed_demo_data,
        "investment simulation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
