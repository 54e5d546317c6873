//! Converts store and gateway errors into the response envelope.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::common::ApiResponse;
use crate::domains::resources::ResourceError;

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::Validation(_) => StatusCode::BAD_REQUEST,
            ResourceError::NotFound(_) => StatusCode::NOT_FOUND,
            ResourceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ResourceError::Store(_) | ResourceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ResourceError::Store(_) | ResourceError::Database(_) => {
                tracing::error!(error = %self, "Store operation failed");
            }
            _ => tracing::debug!(class = self.class(), error = %self, "Request rejected"),
        }

        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ResourceError {
    fn from(rejection: JsonRejection) -> Self {
        ResourceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ResourceError {
    fn from(rejection: QueryRejection) -> Self {
        ResourceError::Validation(rejection.body_text())
    }
}
