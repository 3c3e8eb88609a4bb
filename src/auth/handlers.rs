use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{parse_body, AuthResponse, SigninRequest, SignupRequest},
        extractors::AuthUser,
        repo_types::UserProfile,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/profile", get(profile))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let payload = parse_body(body)?;
    payload.validate()?;

    let response = state
        .auth
        .signup(payload.email, payload.name, payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, body))]
pub async fn signin(
    State(state): State<AppState>,
    body: Result<Json<SigninRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let payload = parse_body(body)?;
    payload.validate()?;

    let response = state.auth.signin(payload.email, payload.password).await?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state.auth.profile(user_id).await?;
    Ok(Json(profile))
}
