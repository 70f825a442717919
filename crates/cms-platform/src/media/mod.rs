//! Media images and public URL resolution

pub mod entity;
pub mod url_resolver;

pub use entity::MediaImage;
pub use url_resolver::MediaUrlResolver;
