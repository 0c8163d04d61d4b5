//! Bearer-token authentication middleware

use std::sync::Arc;

use assistly_shared::UserPublic;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::service::AuthService;
use crate::error::{ApiError, ApiResult};

/// State handed to the auth middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// Identity attached to every request that passed [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserPublic,
    /// Raw bearer token of this request, for logout
    pub token: String,
}

impl AuthUser {
    /// Admin-only routes call this before doing anything else
    pub fn require_admin(&self) -> ApiResult<()> {
        if self.user.role.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user.id, "Admin route refused for non-admin user");
            Err(ApiError::Forbidden)
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Anything else, including an
/// empty token, yields `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Reject the request with 401 unless it carries a token that resolves to
/// an active user; otherwise attach [`AuthUser`] for the handlers.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(request.headers()).map(str::to_owned) else {
        return ApiError::Unauthorized.into_response();
    };

    match state.auth.resolve(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AuthUser { user, token });
            next.run(request).await
        }
        Ok(None) => ApiError::Unauthorized.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_forms() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("abc")), None);
    }
}
