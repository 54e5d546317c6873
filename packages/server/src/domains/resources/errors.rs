use thiserror::Error;

use crate::common::{AuthError, ResourceId};

/// Errors surfaced by the resource store and its gateway.
///
/// Each variant maps onto one failure class of the response envelope; none of
/// them is retried by the server.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(ResourceId),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResourceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ResourceError::Validation(message.into())
    }

    /// Short machine-readable class, used in logs.
    pub fn class(&self) -> &'static str {
        match self {
            ResourceError::Validation(_) => "validation",
            ResourceError::NotFound(_) => "not_found",
            ResourceError::Unauthorized(_) => "unauthorized",
            ResourceError::Store(_) | ResourceError::Database(_) => "store",
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        ResourceError::Validation(err.to_string())
    }
}

pub type ResourceResult<T> = Result<T, ResourceError>;
