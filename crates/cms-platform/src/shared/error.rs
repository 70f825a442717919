//! Platform Error Types

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use utoipa::ToSchema;

use crate::usecase::UseCaseError;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        details: HashMap<String, serde_json::Value>,
    },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            message: format!("{} with id '{}' not found", entity_type, id),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PlatformError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlatformError::Conflict { .. } => StatusCode::CONFLICT,
            PlatformError::BusinessRule { .. } => StatusCode::CONFLICT,
            PlatformError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = match &self {
            PlatformError::NotFound { .. } => "NOT_FOUND",
            PlatformError::Conflict { .. } => "CONFLICT",
            PlatformError::BusinessRule { .. } => "BUSINESS_RULE_VIOLATION",
            PlatformError::Validation { .. } => "VALIDATION_ERROR",
            _ => "INTERNAL_ERROR",
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let details = match &self {
            PlatformError::Conflict { details, .. } if !details.is_empty() => {
                serde_json::to_value(details).ok()
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<UseCaseError> for PlatformError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::ValidationError { message, .. } => PlatformError::Validation { message },
            UseCaseError::BusinessRuleViolation { message, .. } => {
                PlatformError::BusinessRule { message }
            }
            UseCaseError::NotFoundError { message, .. } => PlatformError::NotFound { message },
            UseCaseError::ConcurrencyError { message, details, .. } => {
                PlatformError::Conflict { message, details }
            }
            UseCaseError::CommitError { message, .. } => PlatformError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details;

    #[test]
    fn test_use_case_error_mapping() {
        let err: PlatformError = UseCaseError::not_found("PAGE_NOT_FOUND", "gone").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: PlatformError = UseCaseError::concurrency_with_details(
            "PAGE_VERSION_CONFLICT",
            "stale",
            details! { "version" => 4 },
        )
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, PlatformError::Conflict { ref details, .. } if details.contains_key("version")));

        let err: PlatformError = UseCaseError::commit("boom").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message() {
        let err = PlatformError::not_found("Tag", "T1");
        assert_eq!(err.to_string(), "Not found: Tag with id 'T1' not found");
    }
}
