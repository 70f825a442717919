//! Page access rules

pub mod rule;
pub mod service;

pub use rule::{AccessLevel, AccessRule};
pub use service::AccessControlService;
