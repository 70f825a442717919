//! Audit Log
//!
//! Written by the unit of work for every commit.

pub mod entity;

pub use entity::{AuditLog, AUDIT_LOG_COLLECTION};
