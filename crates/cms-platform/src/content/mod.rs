//! Contents and their placement on pages

pub mod entity;

pub use entity::{Content, ContentKind, ContentStatus, PageContent};
