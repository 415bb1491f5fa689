#![deny(missing_docs)]
//! Image types shared by the cardscan crates

/// image representation for card detection purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
