use std::sync::{
    mpsc::{self, Receiver, TryRecvError},
    Arc,
};

use cardscan_detect::{
    detect_rectangles, errors::DetectError, DetectRectanglesConfig, RectangleObservation,
};
use cardscan_geometry::{map_to_container, PixelRect, Size};
use cardscan_image::Image;

use crate::error::ScanError;

/// Handle of an overlay added to an [`OverlaySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Appearance of an unfilled rectangular border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    /// RGB color of the border.
    pub color: [u8; 3],
    /// Width of the border in pixels, drawn inside the frame.
    pub thickness: usize,
}

impl BorderStyle {
    /// Orange 3 px border marking a detected card.
    pub const DETECTION: Self = Self {
        color: [255, 165, 0],
        thickness: 3,
    };

    /// Blue 4 px border outlining the image container.
    pub const CONTAINER: Self = Self {
        color: [0, 0, 255],
        thickness: 4,
    };
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self::DETECTION
    }
}

/// A view that displays the image and hosts bordered overlays on top of it.
pub trait OverlaySurface {
    /// Size of the view the image is displayed in, aspect-fill.
    fn bounds(&self) -> Size;

    /// Adds an unfilled border at `frame`, in view coordinates.
    fn add_border(&mut self, frame: PixelRect, style: BorderStyle) -> OverlayId;

    /// Removes a previously added overlay. Unknown ids are ignored.
    fn remove(&mut self, id: OverlayId);
}

type DetectionResult = Result<Option<RectangleObservation>, DetectError>;

/// The outcome of a detection running on a worker thread.
///
/// Delivers at most one result. Dropping it discards the result once the worker finishes.
pub struct PendingDetection {
    rx: Receiver<DetectionResult>,
}

impl PendingDetection {
    /// Blocks until the worker sends its result.
    pub fn wait(self) -> Result<Option<RectangleObservation>, ScanError> {
        let result = self.rx.recv().map_err(|_| ScanError::WorkerDisconnected)?;
        Ok(result?)
    }

    /// Returns the result if the worker has finished, `None` while it is still running.
    pub fn try_take(&self) -> Option<Result<Option<RectangleObservation>, ScanError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.map_err(ScanError::from)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ScanError::WorkerDisconnected)),
        }
    }
}

fn spawn_detection(image: Arc<Image<u8, 3>>, config: DetectRectanglesConfig) -> PendingDetection {
    let (tx, rx) = mpsc::channel();

    let worker = std::thread::Builder::new()
        .name("card-detect".into())
        .spawn(move || {
            let result = detect_rectangles(&image, config).map(|obs| obs.into_iter().next());
            // the receiver may be gone already
            let _ = tx.send(result);
        });

    if let Err(e) = worker {
        log::error!("failed to spawn the detection worker: {e}");
    }

    PendingDetection { rx }
}

/// Holds the displayed image and the overlay marking the detected card.
///
/// Detection runs off the calling thread; its result is handed back through a
/// [`PendingDetection`] and applied with [`CardScanner::handle_detection`] by the owner
/// of the scanner.
pub struct CardScanner<S: OverlaySurface> {
    surface: S,
    image: Option<Arc<Image<u8, 3>>>,
    overlay: Option<OverlayId>,
    config: DetectRectanglesConfig,
    style: BorderStyle,
}

impl<S: OverlaySurface> CardScanner<S> {
    /// Creates a scanner drawing on `surface` with the default overlay style.
    pub fn new(surface: S, config: DetectRectanglesConfig) -> Self {
        Self {
            surface,
            image: None,
            overlay: None,
            config,
            style: BorderStyle::default(),
        }
    }

    /// Sets the style of the overlays drawn from now on.
    pub fn with_style(mut self, style: BorderStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns a reference to the surface.
    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns a mutable reference to the surface.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Returns the current image, if any.
    #[inline]
    pub fn image(&self) -> Option<&Image<u8, 3>> {
        self.image.as_deref()
    }

    /// Returns the handle of the overlay currently drawn, if any.
    #[inline]
    pub fn overlay(&self) -> Option<OverlayId> {
        self.overlay
    }

    /// Returns a reference to the detector configuration.
    #[inline]
    pub fn config(&self) -> &DetectRectanglesConfig {
        &self.config
    }

    /// Replaces the current image and starts a detection on it.
    ///
    /// The overlay of the previous image stays until a new detection is handled.
    pub fn set_image(&mut self, image: Image<u8, 3>) -> PendingDetection {
        log::debug!("new image of size {}", image.size());
        let image = Arc::new(image);
        self.image = Some(image.clone());
        spawn_detection(image, self.config.clone())
    }

    /// Starts a detection on the current image.
    ///
    /// Returns `None` if no image was set. Each call starts an independent worker.
    pub fn detect(&self) -> Option<PendingDetection> {
        let image = self.image.clone()?;
        Some(spawn_detection(image, self.config.clone()))
    }

    /// Applies a detection result to the surface.
    ///
    /// The bounding box is mapped with the image current at the time of the call and the
    /// bounds of the surface. Errors and empty results leave the surface untouched.
    ///
    /// # Returns
    ///
    /// The rectangle drawn, in surface coordinates.
    pub fn handle_detection(
        &mut self,
        result: Result<Option<RectangleObservation>, ScanError>,
    ) -> Option<PixelRect> {
        let observation = match result {
            Ok(Some(observation)) => observation,
            Ok(None) => {
                log::debug!("no rectangle detected");
                return None;
            }
            Err(e) => {
                log::warn!("rectangle detection failed: {e}");
                return None;
            }
        };

        let Some(image) = self.image.as_ref() else {
            log::warn!("detection result without an image, skipping");
            return None;
        };

        let image_size = Size::new(image.width() as f64, image.height() as f64);
        let rect = map_to_container(observation.bounding_box, image_size, self.surface.bounds());

        log::debug!(
            "rectangle {:?} with confidence {} mapped to {rect}",
            observation.bounding_box,
            observation.confidence
        );

        self.draw_bounding_box(rect);
        Some(rect)
    }

    /// Draws `rect` on the surface, replacing the overlay drawn before.
    pub fn draw_bounding_box(&mut self, rect: PixelRect) -> OverlayId {
        if let Some(id) = self.overlay.take() {
            self.surface.remove(id);
        }

        let id = self.surface.add_border(rect, self.style);
        self.overlay = Some(id);
        id
    }
}
