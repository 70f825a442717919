//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod api_common;
pub mod entity;
pub mod error;
pub mod event_publisher;
pub mod health_api;
pub mod indexes;
pub mod memory_store;
pub mod middleware;
pub mod repository;
pub mod tsid;

pub use api_common::{IdResponse, SuccessResponse};
pub use entity::{Audit, Entity};
pub use error::{PlatformError, Result};
pub use event_publisher::{ChannelEventPublisher, EventEnvelope, EventPublisher, RecordingEventPublisher};
pub use health_api::{health_router, HealthState};
pub use memory_store::InMemoryStore;
pub use middleware::RequestPrincipal;
pub use repository::{Repository, StoreBackend};
pub use tsid::TsidGenerator;
