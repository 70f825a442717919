//! Blog options
//!
//! Templates available to blog posts and the default one new posts use.

pub mod api;
pub mod entity;
pub mod service;

pub use api::{blog_options_router, BlogOptionsState};
pub use entity::BlogOption;
pub use service::{BlogOptionService, SaveDefaultTemplateCommand, TemplateModel};
