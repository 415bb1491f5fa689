#![deny(missing_docs)]
//! # Cardscan Detect
//!
//! Finds the most prominent rectangular shapes in an image, such as a card lying on a table.

use std::cmp::Ordering;

use cardscan_geometry::{NormalizedRect, PixelRect, Point2};
use cardscan_image::{Image, ImageError, ImageSize};
use cardscan_imgproc::{
    color::gray_from_rgb_u8, resize::resize_into_rect_nearest, threshold::threshold_otsu,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::DetectError,
    quad::{fit_quad, Quad},
    segmentation::{collect_components, find_connected_components},
    union_find::UnionFind,
};

/// Error types for rectangle detection.
pub mod errors;

/// Quadrilateral fitting utilities.
pub mod quad;

/// Connected component utilities.
pub mod segmentation;

/// Union-find utilities.
pub mod union_find;

/// Constraints a shape must satisfy to be reported as a rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectRectanglesConfig {
    /// Smallest accepted ratio between the short and the long side, in [0, 1].
    pub minimum_aspect_ratio: f32,
    /// Largest accepted ratio between the short and the long side, in [0, 1].
    pub maximum_aspect_ratio: f32,
    /// Largest accepted deviation of a corner from a right angle, in degrees.
    pub quadrature_tolerance: f32,
    /// Smallest accepted short side, as a fraction of the smaller image dimension.
    pub minimum_size: f32,
    /// Smallest accepted confidence.
    pub minimum_confidence: f32,
    /// Largest number of reported rectangles. `0` reports all of them.
    pub maximum_observations: usize,
    /// Components with fewer pixels are not considered.
    pub min_cluster_pixels: usize,
}

impl Default for DetectRectanglesConfig {
    fn default() -> Self {
        Self {
            minimum_aspect_ratio: 0.5,
            maximum_aspect_ratio: 1.0,
            quadrature_tolerance: 30.0,
            minimum_size: 0.2,
            minimum_confidence: 0.0,
            maximum_observations: 1,
            min_cluster_pixels: 24,
        }
    }
}

impl DetectRectanglesConfig {
    /// Checks that every value is inside its valid range.
    pub fn validate(&self) -> Result<(), DetectError> {
        let unit = 0.0..=1.0;

        if !unit.contains(&self.minimum_aspect_ratio) || !unit.contains(&self.maximum_aspect_ratio)
        {
            return Err(DetectError::InvalidConfig(format!(
                "aspect ratios must be in [0, 1], got {} and {}",
                self.minimum_aspect_ratio, self.maximum_aspect_ratio
            )));
        }

        if self.minimum_aspect_ratio > self.maximum_aspect_ratio {
            return Err(DetectError::InvalidConfig(format!(
                "minimum aspect ratio {} is larger than the maximum {}",
                self.minimum_aspect_ratio, self.maximum_aspect_ratio
            )));
        }

        if !(0.0..=45.0).contains(&self.quadrature_tolerance) {
            return Err(DetectError::InvalidConfig(format!(
                "quadrature tolerance must be in [0, 45] degrees, got {}",
                self.quadrature_tolerance
            )));
        }

        if !unit.contains(&self.minimum_size) {
            return Err(DetectError::InvalidConfig(format!(
                "minimum size must be in [0, 1], got {}",
                self.minimum_size
            )));
        }

        if !unit.contains(&self.minimum_confidence) {
            return Err(DetectError::InvalidConfig(format!(
                "minimum confidence must be in [0, 1], got {}",
                self.minimum_confidence
            )));
        }

        Ok(())
    }
}

/// A detected rectangle in normalized image coordinates with the origin at the bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectangleObservation {
    /// Top-left corner.
    pub top_left: Point2,
    /// Top-right corner.
    pub top_right: Point2,
    /// Bottom-right corner.
    pub bottom_right: Point2,
    /// Bottom-left corner.
    pub bottom_left: Point2,
    /// Axis aligned bounds of the corners.
    pub bounding_box: NormalizedRect,
    /// Detection confidence in [0, 1].
    pub confidence: f32,
}

impl RectangleObservation {
    fn from_quad(quad: &Quad, img_size: ImageSize) -> Self {
        let w = img_size.width as f64;
        let h = img_size.height as f64;
        let normalize = |p: &Point2| Point2::new(p.x / w, 1.0 - p.y / h);

        let (min_x, min_y, max_x, max_y) = quad.bounds();
        let [tl, tr, br, bl] = &quad.corners;

        Self {
            top_left: normalize(tl),
            top_right: normalize(tr),
            bottom_right: normalize(br),
            bottom_left: normalize(bl),
            bounding_box: NormalizedRect::new(
                min_x / w,
                1.0 - max_y / h,
                (max_x - min_x) / w,
                (max_y - min_y) / h,
            ),
            confidence: quad.confidence,
        }
    }
}

/// Detector for rectangles in grayscale images of a fixed size.
pub struct RectangleDetector {
    config: DetectRectanglesConfig,
    img_size: ImageSize,
    bin_img: Image<u8, 1>,
    uf: UnionFind,
}

impl RectangleDetector {
    /// Creates a new `RectangleDetector` with the given configuration and image size.
    ///
    /// # Arguments
    ///
    /// * `config` - The rectangle constraints.
    /// * `img_size` - The size of the images to be processed.
    ///
    /// # Returns
    ///
    /// The detector, or an error if the configuration is invalid or the size is empty.
    pub fn new(config: DetectRectanglesConfig, img_size: ImageSize) -> Result<Self, DetectError> {
        config.validate()?;

        if img_size.width == 0 || img_size.height == 0 {
            return Err(ImageError::EmptyImage(img_size.width, img_size.height).into());
        }

        let bin_img = Image::from_size_val(img_size, 0)?;
        let uf = UnionFind::new(img_size.area());

        Ok(Self {
            config,
            img_size,
            bin_img,
            uf,
        })
    }

    /// Returns a reference to the detector configuration.
    #[inline]
    pub fn config(&self) -> &DetectRectanglesConfig {
        &self.config
    }

    /// Returns the image size the detector was created for.
    #[inline]
    pub fn image_size(&self) -> ImageSize {
        self.img_size
    }

    /// Detects rectangles in the provided grayscale image.
    ///
    /// # Arguments
    ///
    /// * `src` - The grayscale image, of the size given to [`RectangleDetector::new`].
    ///
    /// # Returns
    ///
    /// The observations sorted by decreasing confidence, then by decreasing area,
    /// at most `maximum_observations` of them. An empty vector if nothing matched.
    pub fn detect(&mut self, src: &Image<u8, 1>) -> Result<Vec<RectangleObservation>, DetectError> {
        if src.size() != self.img_size {
            return Err(DetectError::ImageSizeMismatch(src.size(), self.img_size));
        }

        self.uf.reset();

        // Step 1: Global Threshold
        let threshold = threshold_otsu(src, &mut self.bin_img)?;
        log::debug!("otsu threshold: {threshold}");

        // Step 2: Connected Components
        find_connected_components(&self.bin_img, &mut self.uf)?;
        let components =
            collect_components(&self.bin_img, &mut self.uf, self.config.min_cluster_pixels);

        // Step 3: Quad Fitting
        let mut quads = components
            .iter()
            .filter(|c| !c.touches_border)
            .filter_map(|c| fit_quad(c, &self.config, self.img_size))
            .collect::<Vec<_>>();

        log::debug!(
            "{} components, {} rectangle candidates",
            components.len(),
            quads.len()
        );

        quads.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then(b.area.partial_cmp(&a.area).unwrap_or(Ordering::Equal))
        });

        if self.config.maximum_observations > 0 {
            quads.truncate(self.config.maximum_observations);
        }

        Ok(quads
            .iter()
            .map(|q| RectangleObservation::from_quad(q, self.img_size))
            .collect())
    }
}

/// Largest number of pixels [`detect_rectangles`] analyses. Larger images are downscaled.
pub const MAX_ANALYSIS_PIXELS: usize = 1 << 20;

/// Size an image of `size` is analysed at: the largest size of the same aspect ratio
/// holding at most `max_pixels` pixels, or `size` itself if it already fits.
pub fn analysis_size(size: ImageSize, max_pixels: usize) -> ImageSize {
    if max_pixels == 0 || size.area() <= max_pixels {
        return size;
    }

    let scale = (max_pixels as f64 / size.area() as f64).sqrt();
    let mut width = ((size.width as f64 * scale) as usize).max(1);
    let mut height = ((size.height as f64 * scale) as usize).max(1);

    // a side clamped to one pixel leaves the budget to the other one
    if width * height > max_pixels {
        if width >= height {
            width = (max_pixels / height).max(1);
        } else {
            height = (max_pixels / width).max(1);
        }
    }

    ImageSize { width, height }
}

/// Detects rectangles in a color image with a detector created for this call only.
///
/// Images above [`MAX_ANALYSIS_PIXELS`] are downscaled first. The observations are
/// normalized, so they apply to the full resolution image unchanged.
///
/// # Arguments
///
/// * `src` - The RGB image.
/// * `config` - The rectangle constraints.
pub fn detect_rectangles(
    src: &Image<u8, 3>,
    config: DetectRectanglesConfig,
) -> Result<Vec<RectangleObservation>, DetectError> {
    let size = analysis_size(src.size(), MAX_ANALYSIS_PIXELS);
    let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;

    if size == src.size() {
        gray_from_rgb_u8(src, &mut gray)?;
    } else {
        log::debug!("downscaling {} to {} for detection", src.size(), size);
        let mut small = Image::<u8, 3>::from_size_val(size, 0)?;
        let rect = PixelRect::new(0.0, 0.0, size.width as f64, size.height as f64);
        resize_into_rect_nearest(src, &mut small, rect)?;
        gray_from_rgb_u8(&small, &mut gray)?;
    }

    let mut detector = RectangleDetector::new(config, size)?;
    detector.detect(&gray)
}
