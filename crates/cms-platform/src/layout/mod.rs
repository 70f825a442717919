//! Layouts and regions

pub mod entity;

pub use entity::{Layout, LayoutRegion, Region};
