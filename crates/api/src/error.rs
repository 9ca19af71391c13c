//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openslot_domain::OpenSlotError;
use tracing::error;

use crate::handlers::ApiEnvelope;

/// Error wrapper that renders domain errors as JSON envelopes.
#[derive(Debug)]
pub struct ApiError(pub OpenSlotError);

impl From<OpenSlotError> for ApiError {
    fn from(err: OpenSlotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OpenSlotError::NotFound(_) => StatusCode::NOT_FOUND,
            OpenSlotError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            OpenSlotError::Auth(_) => StatusCode::UNAUTHORIZED,
            OpenSlotError::Network(_) => StatusCode::BAD_GATEWAY,
            OpenSlotError::Database(_) | OpenSlotError::Config(_) | OpenSlotError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error!(error = %self.0, status = %status, "request failed");
        (status, Json(ApiEnvelope::<()>::failure(self.0.to_string()))).into_response()
    }
}

/// Result type alias for handler functions.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
