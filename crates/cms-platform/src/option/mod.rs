//! Page options
//!
//! Option values are embedded in layouts (as definitions with defaults),
//! master pages and pages; the effective set for a page is merged down that
//! chain.

pub mod service;
pub mod value;

pub use service::OptionService;
pub use value::{OptionType, OptionValue};
