use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{error::AppResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64, // seconds since startup
    pub environment: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health))
}

fn now_rfc3339() -> AppResult<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| anyhow::anyhow!(e).into())
}

pub async fn service_status(State(state): State<AppState>) -> AppResult<Json<ServiceStatus>> {
    Ok(Json(ServiceStatus {
        status: "running",
        timestamp: now_rfc3339()?,
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.server.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> AppResult<Json<Health>> {
    Ok(Json(Health {
        status: "healthy",
        timestamp: now_rfc3339()?,
    }))
}
