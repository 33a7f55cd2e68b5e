use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use murmur_store::StoreError;
use murmur_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing bearer header, or the identifier in it is unknown.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Username already bound to someone else.
    #[error("Username '{0}' is already taken")]
    Conflict(String),

    #[error("{0}")]
    Validation(&'static str),

    /// The body could not be read at all; keeps the status axum chose
    /// (413 past the size limit).
    #[error("{1}")]
    Body(StatusCode, String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Body(status, _) => *status,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Conflict(name) => Self::Conflict(name),
            StoreError::Poisoned => {
                error!("Store unavailable: lock poisoned");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::BytesRejection(bytes) => Self::Body(bytes.status(), bytes.body_text()),
            _ => Self::Validation("Invalid body"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found: ApiError = StoreError::NotFound("message").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "message not found");

        let conflict: ApiError = StoreError::Conflict("bob".into()).into();
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let poisoned: ApiError = StoreError::Poisoned.into();
        assert_eq!(poisoned.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unreadable_body_keeps_its_status() {
        let too_large = ApiError::Body(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.to_string(), "length limit exceeded");
    }
}
