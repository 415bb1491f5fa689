/// A width/height pair in real units.
///
/// Describes either the intrinsic pixel dimensions of an image or the display
/// dimensions of the container that shows it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Ratio between width and height.
    ///
    /// A zero height yields an infinite or NaN ratio, never a panic.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// A point in real-valued coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A rectangle inside the unit square with its origin at the bottom-left corner.
///
/// This is the convention rectangle detectors report their results in: values are
/// independent of the pixel dimensions of the analysed image and y grows upwards.
/// No range invariant is enforced; a degenerate detection may have zero extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedRect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl NormalizedRect {
    /// Creates a new normalized rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole unit square.
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Moves the origin from the bottom-left to the top-left corner of the unit square.
    ///
    /// Only `y` changes: `1 - y - height`. Applying it twice gives back the original rectangle.
    ///
    /// # Example
    ///
    /// ```
    /// use cardscan_geometry::NormalizedRect;
    ///
    /// let r = NormalizedRect::new(0.1, 0.2, 0.3, 0.4).flipped();
    /// assert!((r.y - 0.4).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            y: 1.0 - self.y - self.height,
            ..*self
        }
    }

    /// Scales the rectangle from the unit square to a pixel extent.
    ///
    /// The y axis is taken as is; call [`NormalizedRect::flipped`] first to convert from
    /// the bottom-left convention. The extent is not truncated to whole pixels.
    #[inline]
    pub fn to_pixels(&self, extent: Size) -> PixelRect {
        PixelRect {
            x: self.x * extent.width,
            y: self.y * extent.height,
            width: self.width * extent.width,
            height: self.height * extent.height,
        }
    }
}

/// A rectangle in pixel or point units with the origin at the top-left and y growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl PixelRect {
    /// Creates a new pixel rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, `x + width`.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[inline]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "(x: {:.2}, y: {:.2}, width: {:.2}, height: {:.2})",
            self.x, self.y, self.width, self.height
        )
    }
}
