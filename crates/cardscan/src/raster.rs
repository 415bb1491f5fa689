use cardscan_geometry::{aspect_fill_rect, PixelRect, Size};
use cardscan_image::{Image, ImageError, ImageSize};
use cardscan_imgproc::{draw::draw_rect_border, resize::resize_into_rect_nearest};

use crate::scanner::{BorderStyle, OverlayId, OverlaySurface};

/// A fixed size view that shows an image aspect-fill and keeps track of its overlays.
///
/// Rendering produces an RGB canvas, so the view can be inspected or written to disk.
#[derive(Debug, Clone)]
pub struct RasterContainer {
    size: ImageSize,
    background: [u8; 3],
    border: BorderStyle,
    overlays: Vec<(OverlayId, PixelRect, BorderStyle)>,
    next_id: u64,
}

impl RasterContainer {
    /// Creates an empty container of `width` x `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: ImageSize { width, height },
            background: [178, 255, 178],
            border: BorderStyle::CONTAINER,
            overlays: Vec::new(),
            next_id: 0,
        }
    }

    /// Sets the color shown where neither the image nor a border is drawn.
    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.background = color;
        self
    }

    /// Sets the border drawn around the container. A zero thickness disables it.
    pub fn with_border(mut self, style: BorderStyle) -> Self {
        self.border = style;
        self
    }

    /// Size of the container in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The overlays currently shown, in drawing order.
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, PixelRect)> + '_ {
        self.overlays.iter().map(|(id, frame, _)| (*id, *frame))
    }

    /// Renders the container showing `image`.
    ///
    /// The canvas is the container grown by `margin` pixels on every side. The image is
    /// scaled to fill the container and its overflow shows inside the margin. The
    /// container border and the overlays are drawn on top.
    ///
    /// # Errors
    ///
    /// Fails if the image is empty.
    pub fn render(&self, image: &Image<u8, 3>, margin: usize) -> Result<Image<u8, 3>, ImageError> {
        let canvas_size = ImageSize {
            width: self.size.width + 2 * margin,
            height: self.size.height + 2 * margin,
        };
        let mut canvas = Image::from_size_pixel(canvas_size, self.background)?;

        let offset = margin as f64;
        let image_size = Size::new(image.width() as f64, image.height() as f64);
        let image_rect = aspect_fill_rect(image_size, self.bounds()).translated(offset, offset);
        resize_into_rect_nearest(image, &mut canvas, image_rect)?;

        let container = PixelRect::new(
            offset,
            offset,
            self.size.width as f64,
            self.size.height as f64,
        );
        draw_border(&mut canvas, container, self.border);

        for (_, frame, style) in &self.overlays {
            draw_border(&mut canvas, frame.translated(offset, offset), *style);
        }

        Ok(canvas)
    }
}

fn draw_border(canvas: &mut Image<u8, 3>, frame: PixelRect, style: BorderStyle) {
    let top_left = (frame.x.round() as i64, frame.y.round() as i64);
    let bottom_right = (frame.max_x().round() as i64, frame.max_y().round() as i64);
    draw_rect_border(canvas, top_left, bottom_right, style.color, style.thickness);
}

impl OverlaySurface for RasterContainer {
    fn bounds(&self) -> Size {
        Size::new(self.size.width as f64, self.size.height as f64)
    }

    fn add_border(&mut self, frame: PixelRect, style: BorderStyle) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.overlays.push((id, frame, style));
        id
    }

    fn remove(&mut self, id: OverlayId) {
        self.overlays.retain(|(o, _, _)| *o != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn pixel(img: &Image<u8, 3>, x: usize, y: usize) -> [u8; 3] {
        let i = (y * img.width() + x) * 3;
        let s = img.as_slice();
        [s[i], s[i + 1], s[i + 2]]
    }

    fn no_border() -> BorderStyle {
        BorderStyle {
            color: BLACK,
            thickness: 0,
        }
    }

    #[test]
    fn overlays_are_tracked() {
        let mut container = RasterContainer::new(10, 10);
        let a = container.add_border(PixelRect::new(0.0, 0.0, 2.0, 2.0), BorderStyle::DETECTION);
        let b = container.add_border(PixelRect::new(1.0, 1.0, 2.0, 2.0), BorderStyle::DETECTION);
        assert_ne!(a, b);
        assert_eq!(container.overlays().count(), 2);

        container.remove(a);
        container.remove(OverlayId(42));
        assert_eq!(container.overlays().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
        assert_eq!(container.bounds(), Size::new(10.0, 10.0));
    }

    #[test]
    fn render_fills_container() -> Result<(), ImageError> {
        let container = RasterContainer::new(6, 4).with_border(BorderStyle {
            color: [0, 0, 255],
            thickness: 1,
        });
        let image = Image::from_size_pixel(
            ImageSize {
                width: 3,
                height: 2,
            },
            RED,
        )?;

        let canvas = container.render(&image, 2)?;
        assert_eq!(canvas.width(), 10);
        assert_eq!(canvas.height(), 8);

        assert_eq!(pixel(&canvas, 0, 0), [178, 255, 178]);
        assert_eq!(pixel(&canvas, 2, 2), [0, 0, 255]);
        assert_eq!(pixel(&canvas, 7, 5), [0, 0, 255]);
        assert_eq!(pixel(&canvas, 4, 4), RED);
        assert_eq!(pixel(&canvas, 8, 6), [178, 255, 178]);

        Ok(())
    }

    #[test]
    fn render_shows_overflow_in_margin() -> Result<(), ImageError> {
        let container = RasterContainer::new(4, 4).with_border(no_border());
        // twice as wide as high: drawn 8 wide, centered
        let image = Image::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            [RED, GREEN].concat(),
        )?;

        let canvas = container.render(&image, 2)?;

        assert_eq!(pixel(&canvas, 0, 3), RED);
        assert_eq!(pixel(&canvas, 7, 3), GREEN);
        assert_eq!(pixel(&canvas, 0, 0), [178, 255, 178]);
        assert_eq!(pixel(&canvas, 7, 7), [178, 255, 178]);

        Ok(())
    }

    #[test]
    fn render_draws_overlays_inside_frame() -> Result<(), ImageError> {
        let mut container = RasterContainer::new(8, 8).with_border(no_border());
        container.add_border(
            PixelRect::new(1.0, 1.0, 4.0, 4.0),
            BorderStyle {
                color: GREEN,
                thickness: 1,
            },
        );
        let image = Image::from_size_pixel(
            ImageSize {
                width: 1,
                height: 1,
            },
            RED,
        )?;

        let canvas = container.render(&image, 0)?;

        assert_eq!(pixel(&canvas, 1, 1), GREEN);
        assert_eq!(pixel(&canvas, 4, 4), GREEN);
        assert_eq!(pixel(&canvas, 2, 2), RED);
        assert_eq!(pixel(&canvas, 5, 5), RED);
        assert_eq!(pixel(&canvas, 0, 0), RED);

        Ok(())
    }
}
