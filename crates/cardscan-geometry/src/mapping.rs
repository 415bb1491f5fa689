use crate::rect::{NormalizedRect, PixelRect, Point2, Size};

/// Computes where an image is drawn inside a container under an aspect-fill policy.
///
/// The image is scaled uniformly until it covers the whole container and is centered.
/// The returned rectangle is the full drawn extent in container coordinates, including
/// the parts that overflow the container; it is not clipped.
///
/// # Arguments
///
/// * `image_size` - The intrinsic size of the image.
/// * `container_size` - The size of the container displaying the image.
///
/// # Returns
///
/// The rectangle covered by the whole image, in container coordinates.
///
/// # Example
///
/// ```
/// use cardscan_geometry::{aspect_fill_rect, PixelRect, Size};
///
/// let rect = aspect_fill_rect(Size::new(200.0, 100.0), Size::new(100.0, 100.0));
/// assert_eq!(rect, PixelRect::new(-50.0, 0.0, 200.0, 100.0));
/// ```
pub fn aspect_fill_rect(image_size: Size, container_size: Size) -> PixelRect {
    let image_aspect = image_size.aspect();
    let container_aspect = container_size.aspect();

    if image_aspect > container_aspect {
        // overflows left and right
        let width = container_size.height * image_aspect;
        PixelRect {
            x: -(width - container_size.width) / 2.0,
            y: 0.0,
            width,
            height: container_size.height,
        }
    } else {
        // overflows top and bottom, or fits exactly
        let height = container_size.width / image_aspect;
        PixelRect {
            x: 0.0,
            y: -(height - container_size.height) / 2.0,
            width: container_size.width,
            height,
        }
    }
}

/// Maps a detector bounding box into the coordinate space of an aspect-fill container.
///
/// The bounding box is normalized with the origin at the bottom-left. The result has its
/// origin at the top-left of the container, y growing downwards, in container units.
///
/// The mapping is total: nothing is validated or clamped. A box close to the overflowing
/// edge of the image may legitimately land outside the container bounds. Sizes with a
/// zero component produce non-finite values.
///
/// # Arguments
///
/// * `bounding_box` - The detector output in normalized bottom-left space.
/// * `image_size` - The intrinsic size of the analysed image.
/// * `container_size` - The size of the container displaying the image.
///
/// # Example
///
/// ```
/// use cardscan_geometry::{map_to_container, NormalizedRect, PixelRect, Size};
///
/// let rect = map_to_container(
///     NormalizedRect::new(0.25, 0.25, 0.5, 0.5),
///     Size::new(200.0, 100.0),
///     Size::new(100.0, 100.0),
/// );
/// assert_eq!(rect, PixelRect::new(0.0, 25.0, 100.0, 50.0));
/// ```
pub fn map_to_container(
    bounding_box: NormalizedRect,
    image_size: Size,
    container_size: Size,
) -> PixelRect {
    let rect_of_image = aspect_fill_rect(image_size, container_size);

    bounding_box
        .flipped()
        .to_pixels(rect_of_image.size())
        .translated(rect_of_image.x, rect_of_image.y)
}

/// Maps a normalized bottom-left point, such as a detected corner, into container coordinates.
///
/// Same transform as [`map_to_container`] applied to a box of zero extent.
pub fn map_point_to_container(point: Point2, image_size: Size, container_size: Size) -> Point2 {
    let rect = map_to_container(
        NormalizedRect::new(point.x, point.y, 0.0, 0.0),
        image_size,
        container_size,
    );
    Point2::new(rect.x, rect.y)
}
