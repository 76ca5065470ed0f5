use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use service::errors::ServiceError;

/// HTTP-facing error taxonomy. One `IntoResponse` impl serializes every
/// variant as the uniform `{"status":"error","message":...}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// Detail is logged, never sent to the caller.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "internal error");
        } else {
            warn!(status = %status, error = %self, "request failed");
        }
        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => ApiError::Validation(m),
            ServiceError::Conflict(m) => ApiError::Conflict(m),
            ServiceError::Unauthorized => ApiError::Unauthorized("invalid email or password".into()),
            ServiceError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            ServiceError::Hash(m) | ServiceError::Token(m) | ServiceError::Db(m) => ApiError::Internal(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_expected_statuses() {
        assert_eq!(ApiError::from(ServiceError::Conflict("email already in use".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(ServiceError::not_found("subscription")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ServiceError::Db("boom".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = ApiError::from(ServiceError::Db("password hash table exploded".into()));
        assert_eq!(err.to_string(), "internal server error");
    }
}
