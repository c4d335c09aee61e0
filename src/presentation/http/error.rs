use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::error::AccessError;

#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    Access(AccessError),
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        ApiError::Access(e)
    }
}

impl From<StatusCode> for ApiError {
    // Extractor rejections only ever carry 401 here
    fn from(_: StatusCode) -> Self {
        ApiError::Unauthenticated
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Access(AccessError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Access(AccessError::Unauthorized(_)) => StatusCode::FORBIDDEN,
            ApiError::Access(AccessError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Access(AccessError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Unauthenticated => "authentication required".to_string(),
            ApiError::Access(AccessError::Persistence(e)) => {
                tracing::error!(error = ?e, "persistence_error");
                "An unexpected error has occurred".to_string()
            }
            ApiError::Access(e) => e.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
