use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::{FieldErrors, ServiceError};

/// Wire error: every failed request carries the same envelope,
/// `{success: false, message, errors?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        let mut body = serde_json::json!({
            "success": false,
            "message": self.message,
        });
        if let Some(errors) = self.errors {
            body["errors"] = serde_json::to_value(&errors).unwrap_or_default();
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "validation failed".into(),
                errors: Some(errors),
            },
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::NotAuthorized(msg) => Self::new(StatusCode::FORBIDDEN, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ServiceError::VersionConflict { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            ServiceError::Storage(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Model(e) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Hash(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(ApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Conflict).status, StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(AuthError::Validation("bad email".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::Hash("salt".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(AuthError::Token("expired".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_errors_map_to_statuses_and_keep_field_maps() {
        let err = ApiError::from(ServiceError::Validation(FieldErrors::single(
            "title",
            "title is required",
        )));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.errors.as_ref().is_some_and(|e| e.contains("title")));

        let stale = ServiceError::VersionConflict { expected: 1, actual: 3 };
        assert_eq!(ApiError::from(stale).status, StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(ServiceError::not_found("service")).status,
            StatusCode::NOT_FOUND
        );
    }
}
