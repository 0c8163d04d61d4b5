//! Platform admin routes (role check inside handlers)

use assistly_shared::{UserPublic, UserRole};
use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// Enable or disable an account. Disabled accounts lose every session at
/// once without the sessions being deleted.
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<UserPublic>> {
    auth_user.require_admin()?;
    let Json(req) = payload?;

    if user_id == auth_user.user.id && !req.is_active {
        return Err(ApiError::Validation(
            "Admins cannot disable their own account".to_string(),
        ));
    }

    let user = state.auth.set_user_active(user_id, req.is_active).await?;

    tracing::info!(
        admin_id = %auth_user.user.id,
        user_id = %user_id,
        is_active = req.is_active,
        "admin: user status changed"
    );

    Ok(Json(user))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> ApiResult<Json<UserPublic>> {
    auth_user.require_admin()?;
    let Json(req) = payload?;

    if user_id == auth_user.user.id && req.role != UserRole::Admin {
        return Err(ApiError::Validation(
            "Admins cannot demote themselves".to_string(),
        ));
    }

    let user = state.auth.set_user_role(user_id, req.role).await?;

    tracing::info!(
        admin_id = %auth_user.user.id,
        user_id = %user_id,
        role = %req.role,
        "admin: user role changed"
    );

    Ok(Json(user))
}
