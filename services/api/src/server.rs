use crate::cli::ServeArgs;
use crate::infra::{load_config, load_predictor, AppState};
use crate::routes::with_churn_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use churn_ai::error::AppError;
use churn_ai::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = load_config(&args.artifacts)?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let predictor = load_predictor(&config.artifacts)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model_name: predictor.artifacts().classifier().name.clone(),
        artifacts_loaded_at: predictor.artifacts().loaded_at(),
    };

    let app = with_churn_routes(predictor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "churn predictor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
