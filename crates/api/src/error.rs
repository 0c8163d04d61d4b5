//! API error types and handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Authentication errors
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is disabled")]
    AccountDisabled,
    #[error("Email already registered")]
    EmailAlreadyExists,
    #[error("Username already taken")]
    UsernameAlreadyExists,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Registration is currently disabled")]
    SignupDisabled,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Internal errors
    #[error("Internal server error")]
    Internal,
    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", self.to_string()),
            ApiError::AccountDisabled => (StatusCode::FORBIDDEN, "ACCOUNT_DISABLED", self.to_string()),
            ApiError::EmailAlreadyExists => (StatusCode::CONFLICT, "EMAIL_EXISTS", self.to_string()),
            ApiError::UsernameAlreadyExists => (StatusCode::CONFLICT, "USERNAME_EXISTS", self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            ApiError::SignupDisabled => (StatusCode::FORBIDDEN, "SIGNUP_DISABLED", self.to_string()),

            // Validation
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),

            // Resources
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),

            // Internal
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", self.to_string()),
            ApiError::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", self.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => ApiError::EmailAlreadyExists,
            AuthError::DuplicateUsername => ApiError::UsernameAlreadyExists,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::AccountDisabled => ApiError::AccountDisabled,
            AuthError::NoToken => ApiError::Unauthorized,
            AuthError::UserNotFound => ApiError::NotFound,
            AuthError::SignupDisabled => ApiError::SignupDisabled,
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::Hashing(msg) => {
                tracing::error!(error = %msg, "Password hashing failed");
                ApiError::Internal
            }
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                ApiError::Internal
            }
        }
    }
}

/// Body that could not be read or decoded as the expected JSON
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::Validation(rejection.body_text())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assistly_shared::StoreError;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = body_json(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["error"]["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_json_rejection_maps_to_validation() {
        let rejection = JsonRejection::MissingJsonContentType(Default::default());
        let (status, body) = body_json(ApiError::from(rejection)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_store_errors_do_not_leak_details() {
        let err = AuthError::Store(StoreError::Unavailable(
            "connection refused at 10.0.0.7:5432".to_string(),
        ));
        let (status, body) = body_json(ApiError::from(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            ApiError::from(AuthError::DuplicateEmail),
            ApiError::EmailAlreadyExists
        ));
        assert!(matches!(
            ApiError::from(AuthError::DuplicateUsername),
            ApiError::UsernameAlreadyExists
        ));
        assert!(matches!(ApiError::from(AuthError::NoToken), ApiError::Unauthorized));
        assert!(matches!(
            ApiError::from(AuthError::AccountDisabled),
            ApiError::AccountDisabled
        ));
    }
}
