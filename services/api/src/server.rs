use crate::cli::ServeArgs;
use crate::infra::{
    seed_dimension_map, AppState, Engine, InMemoryCatalogStore, InMemoryDimensionStore,
    InMemorySubmissionStore,
};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use qm_core::catalog::CatalogNameMap;
use qm_core::config::AppConfig;
use qm_core::error::AppError;
use qm_core::telemetry;
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

    let engine = Arc::new(Engine::new(
        Arc::new(InMemoryCatalogStore::default()),
        Arc::new(InMemorySubmissionStore::default()),
        Arc::new(InMemoryDimensionStore::seeded(seed_dimension_map())),
        CatalogNameMap::from_pairs(std::iter::empty::<(String, String)>()),
    ));

    let app = with_evaluation_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
