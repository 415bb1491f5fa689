#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Sizes, points and rectangles in the different coordinate spaces.
pub mod rect;

/// Mapping from normalized detector space into an aspect-fill container.
pub mod mapping;

pub use crate::mapping::{aspect_fill_rect, map_point_to_container, map_to_container};
pub use crate::rect::{NormalizedRect, PixelRect, Point2, Size};
