use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use curtail_core::StoreError;
use curtail_service::LinkError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Wraps a [`LinkError`] so the service surface stays free of HTTP types.
#[derive(Debug)]
pub struct ApiError(LinkError);

impl From<LinkError> for ApiError {
    fn from(value: LinkError) -> Self {
        Self(value)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LinkError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            LinkError::DuplicateCode(_) => StatusCode::CONFLICT,
            LinkError::Store(StoreError::Unavailable(_) | StoreError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            LinkError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            LinkError::InvalidUrl(m) => m.clone(),
            LinkError::DuplicateCode(code) => format!("short code already taken: {code}"),
            LinkError::Store(e) => {
                // Backend details stay in the logs, not in the response body.
                error!(error = %e, "store error while serving request");
                "storage backend error".to_string()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
