//! Use Case Errors
//!
//! Categorized error types for use case failures.
//! Errors are categorized by type to enable consistent HTTP status mapping.
//!
//! ```ignore
//! use cms_platform::{details, usecase::UseCaseError};
//!
//! UseCaseError::not_found("PAGE_NOT_FOUND", "Page not found");
//!
//! UseCaseError::concurrency_with_details(
//!     "PAGE_VERSION_CONFLICT",
//!     "Page was modified by another user",
//!     details! { "id" => page.id, "version" => page.audit.version },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Macro for creating error detail maps.
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `BusinessRuleViolation` -> 409 Conflict
/// - `NotFoundError` -> 404 Not Found
/// - `ConcurrencyError` -> 409 Conflict (details carry the stored record's id and version)
/// - `CommitError` -> 500 Internal Server Error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    BusinessRuleViolation {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Optimistic locking conflict - the stored version differs from the caller's.
    ConcurrencyError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Repository read or transaction commit failed.
    CommitError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn business_rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn concurrency(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConcurrencyError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn concurrency_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::ConcurrencyError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "COMMIT_FAILED".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Repository read failure while preparing a use case.
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::CommitError {
            code: "STORAGE_ERROR".to_string(),
            message: format!("{}: {}", context, err),
            details: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. } => code,
            Self::BusinessRuleViolation { code, .. } => code,
            Self::NotFoundError { code, .. } => code,
            Self::ConcurrencyError { code, .. } => code,
            Self::CommitError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::BusinessRuleViolation { message, .. } => message,
            Self::NotFoundError { message, .. } => message,
            Self::ConcurrencyError { message, .. } => message,
            Self::CommitError { message, .. } => message,
        }
    }

    pub fn details(&self) -> &HashMap<String, serde_json::Value> {
        match self {
            Self::ValidationError { details, .. } => details,
            Self::BusinessRuleViolation { details, .. } => details,
            Self::NotFoundError { details, .. } => details,
            Self::ConcurrencyError { details, .. } => details,
            Self::CommitError { details, .. } => details,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFoundError { .. })
    }

    pub fn is_concurrency(&self) -> bool {
        matches!(self, Self::ConcurrencyError { .. })
    }

    /// Get the suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::BusinessRuleViolation { .. } => 409,
            Self::NotFoundError { .. } => 404,
            Self::ConcurrencyError { .. } => 409,
            Self::CommitError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = UseCaseError::not_found("PAGE_NOT_FOUND", "Page not found");
        assert_eq!(err.code(), "PAGE_NOT_FOUND");
        assert_eq!(err.http_status_code(), 404);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_concurrency_error_carries_stored_version() {
        let err = UseCaseError::concurrency_with_details(
            "PAGE_VERSION_CONFLICT",
            "stale",
            details! { "id" => "p-1", "version" => 7 },
        );
        assert!(err.is_concurrency());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.details().get("version"), Some(&serde_json::json!(7)));
    }

    #[test]
    fn test_storage_error_message() {
        let err = UseCaseError::storage("Failed to load page", "connection reset");
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert_eq!(err.message(), "Failed to load page: connection reset");
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_details_macro_empty() {
        let details: HashMap<String, serde_json::Value> = details!();
        assert!(details.is_empty());
    }

    #[test]
    fn test_display() {
        let err = UseCaseError::validation("URL_REQUIRED", "Page URL is required");
        assert_eq!(err.to_string(), "[URL_REQUIRED] Page URL is required");
    }
}
