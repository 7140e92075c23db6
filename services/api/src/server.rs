use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore, LoggingFollowUpScheduler};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sleepscreen::config::AppConfig;
use sleepscreen::error::AppError;
use sleepscreen::quiz::{default_catalog, QuizRuleSet, QuizService};
use sleepscreen::telemetry;
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

    let store = Arc::new(InMemorySessionStore::default());
    let scheduler = Arc::new(LoggingFollowUpScheduler::default());
    let quiz_service = Arc::new(
        QuizService::new(default_catalog(), QuizRuleSet::builtin(), store, scheduler)
            .with_follow_up(config.quiz.follow_up_enabled)
            .with_default_locale(config.quiz.default_locale.clone()),
    );

    let app = with_quiz_routes(quiz_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sleep screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
