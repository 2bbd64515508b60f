use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::clients::ClientError;
use crate::constants::messages;
use crate::services::ServiceError;

/// Failures surfaced by the HTTP handlers.
///
/// Server-side failures all collapse to one generic plain-text body; the
/// detail only goes to the log.
#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    NotFound,

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFound => f.write_str(messages::NOT_FOUND),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, messages::NOT_FOUND).into_response(),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, messages::SERVER_ERROR).into_response()
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::InternalError(format!("could not build provider request: {err}"))
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_detail_from_clients() {
        let response = ApiError::InternalError("db password wrong".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::validation("missing id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
