#![deny(missing_docs)]
//! # Cardscan
//!
//! Finds a card in a photo and places its bounding box over the photo as shown in an
//! aspect-fill view.
//!
//! ```no_run
//! use cardscan::{CardScanner, RasterContainer};
//!
//! let image = cardscan::io::functional::read_image_any_rgb8("card.jpg")?;
//! let mut scanner = CardScanner::new(RasterContainer::new(390, 600), Default::default());
//!
//! let result = scanner.set_image(image).wait();
//! if let Some(rect) = scanner.handle_detection(result) {
//!     println!("card at {rect}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[doc(inline)]
pub use cardscan_image as image;

#[doc(inline)]
pub use cardscan_geometry as geometry;

#[doc(inline)]
pub use cardscan_imgproc as imgproc;

#[doc(inline)]
pub use cardscan_io as io;

#[doc(inline)]
pub use cardscan_detect as detect;

/// Error types of the scanner.
pub mod error;

/// A raster view that renders an image aspect-fill with its overlays.
pub mod raster;

/// Scanner state and the asynchronous detection handoff.
pub mod scanner;

pub use crate::error::ScanError;
pub use crate::raster::RasterContainer;
pub use crate::scanner::{BorderStyle, CardScanner, OverlayId, OverlaySurface, PendingDetection};
