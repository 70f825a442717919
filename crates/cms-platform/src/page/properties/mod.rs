//! Page properties use cases
//!
//! - Get: denormalized read of a page and the records it references
//! - Put: upsert with master page propagation
//! - Delete: cascading soft delete with sitemap unlinking

pub mod delete;
pub mod get;
pub mod models;
pub mod put;

pub use delete::DeletePagePropertiesUseCase;
pub use get::GetPagePropertiesUseCase;
pub use models::*;
pub use put::PutPagePropertiesUseCase;
