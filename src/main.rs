use authsvc::{app, state::AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "authsvc=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    let config = app_state.config.clone();

    let limits = &config.rate_limit;
    if limits.enabled {
        warn!(
            ttl_secs = limits.ttl_secs,
            max_requests = limits.max_requests,
            "rate limiting is configured but not enforced by this service"
        );
    }
    info!(
        environment = %config.server.environment,
        prefix = %config.server.api_prefix,
        "starting authsvc"
    );

    let app = app::build_app(app_state);
    app::serve(app, &config.server).await
}
