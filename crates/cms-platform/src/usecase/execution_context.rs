//! Execution Context
//!
//! Carries tracing IDs and principal information through a use case.

use chrono::{DateTime, Utc};

use crate::shared::tsid::TsidGenerator;

/// Context for a use case execution.
///
/// Populates domain event metadata and audit stamps:
/// - `execution_id` identifies this execution
/// - `correlation_id` ties it to the originating request
/// - `causation_id` names the event that triggered it (if any)
/// - `principal_id` is recorded as created/modified/deleted-by
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub execution_id: String,
    pub correlation_id: String,
    pub causation_id: Option<String>,
    pub principal_id: String,
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a context for a fresh request. Correlation starts as the execution id.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Create a context that continues an upstream correlation id.
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: format!("exec-{}", TsidGenerator::generate()),
            correlation_id: correlation_id.into(),
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Child context within the same execution, caused by the given event.
    pub fn with_causation(&self, causing_event_id: impl Into<String>) -> Self {
        Self {
            execution_id: self.execution_id.clone(),
            correlation_id: self.correlation_id.clone(),
            causation_id: Some(causing_event_id.into()),
            principal_id: self.principal_id.clone(),
            initiated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_context() {
        let ctx = ExecutionContext::create("editor-1");
        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.correlation_id, ctx.execution_id);
        assert!(ctx.causation_id.is_none());
    }

    #[test]
    fn test_with_correlation() {
        let ctx = ExecutionContext::with_correlation("editor-1", "corr-456");
        assert_eq!(ctx.correlation_id, "corr-456");
        assert_ne!(ctx.execution_id, ctx.correlation_id);
    }

    #[test]
    fn test_with_causation() {
        let ctx = ExecutionContext::create("editor-1");
        let child = ctx.with_causation("evt-789");
        assert_eq!(child.execution_id, ctx.execution_id);
        assert_eq!(child.causation_id.as_deref(), Some("evt-789"));
    }
}
