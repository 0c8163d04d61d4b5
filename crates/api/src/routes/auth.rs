//! Authentication routes

use std::time::{Duration, Instant};

use assistly_shared::{AuthSession, LoginData, RegisterData, UserPublic, UserSettings};
use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use crate::{
    auth::{extract_bearer_token, AuthUser},
    error::ApiResult,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct RevokedResponse {
    pub revoked: u64,
}

/// Register a new account and open its first session
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterData>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let Json(req) = payload?;
    let session = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with email and password.
///
/// Every attempt takes at least `LOGIN_MIN_RESPONSE_MS`, whatever the
/// outcome, so response time does not reveal which emails exist.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginData>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = payload?;
    let start = Instant::now();
    let min_response_time = Duration::from_millis(state.config.login_min_response_ms);

    let result = state.auth.login(req).await;

    let elapsed = start.elapsed();
    if elapsed < min_response_time {
        tokio::time::sleep(min_response_time - elapsed).await;
    }

    Ok(Json(result?))
}

/// Revoke the presented session.
///
/// Mounted without the auth middleware: a missing, unknown or expired token
/// is already logged out, so this always answers 204 unless the store fails.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    if let Some(token) = extract_bearer_token(&headers) {
        state.auth.logout(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Current user
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> Json<UserPublic> {
    Json(auth_user.user)
}

/// Replace the current user's settings
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<UserSettings>, JsonRejection>,
) -> ApiResult<Json<UserPublic>> {
    let Json(settings) = payload?;
    let user = state
        .auth
        .update_settings(auth_user.user.id, settings)
        .await?;
    Ok(Json(user))
}

/// Revoke every session of the current user, including this one
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<RevokedResponse>> {
    let revoked = state.auth.logout_all(auth_user.user.id).await?;
    Ok(Json(RevokedResponse { revoked }))
}

