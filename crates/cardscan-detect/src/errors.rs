use cardscan_image::ImageSize;

/// Errors that can occur when detecting rectangles.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DetectError {
    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] cardscan_image::ImageError),

    /// The source image does not have the size the detector was created for.
    #[error("The source image size {0} does not match the detector size {1}")]
    ImageSizeMismatch(ImageSize, ImageSize),

    /// A working buffer does not hold one element per pixel.
    #[error("The working buffer holds {0} elements for {1} pixels")]
    BufferSizeMismatch(usize, usize),

    /// A configuration value is outside of its valid range.
    #[error("Invalid detector configuration: {0}")]
    InvalidConfig(String),
}
