//! Pages

pub mod api;
pub mod entity;
pub mod events;
pub mod properties;
pub mod repository;

pub use api::{pages_router, PagesState};
pub use entity::{Page, PageStatus};
pub use events::{PageCreated, PageDeleted, PagePropertiesChanged};
pub use repository::PageRepository;
