//! Master pages
//!
//! A page may inherit from a master page instead of using a layout directly.
//! One `MasterPage` link row exists per ancestor in a page's master chain.

pub mod entity;
pub mod service;

pub use entity::MasterPage;
pub use service::{MasterPagePlan, MasterPageService};
