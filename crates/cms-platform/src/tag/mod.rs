//! Tags
//!
//! Tags are attached to pages through `PageTag` rows.

pub mod api;
pub mod entity;
pub mod events;
pub mod page_tags;
pub mod repository;
pub mod service;

pub use api::{tags_router, TagsState};
pub use entity::{PageTag, Tag};
pub use events::TagCreated;
pub use page_tags::PageTagService;
pub use repository::TagRepository;
pub use service::{GetTagRequest, PutTagRequest, TagModel, TagService};
