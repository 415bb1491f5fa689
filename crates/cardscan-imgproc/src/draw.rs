use cardscan_image::Image;
use std::cmp::{max, min};

/// Sets a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. Thickness > 1 is approximated with a square brush.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    let half_thickness = if thickness > 1 {
        thickness as i64 / 2
    } else {
        0
    };

    loop {
        for i in -half_thickness..=half_thickness {
            for j in -half_thickness..=half_thickness {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a filled rectangle on an image inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y), inclusive.
/// * `bottom_right` - The bottom-right corner coordinates (x, y), exclusive.
/// * `color` - The fill color of the rectangle.
pub fn draw_filled_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
) {
    let (x_start, y_start) = top_left;
    let (x_end, y_end) = bottom_right;

    // clamp to the image bounds
    let x_min = max(0, min(x_start, x_end));
    let y_min = max(0, min(y_start, y_end));
    let x_max = min(img.cols() as i64, max(x_start, x_end));
    let y_max = min(img.rows() as i64, max(y_start, y_end));

    for y in y_min..y_max {
        for x in x_min..x_max {
            set_pixel(img, x, y, color);
        }
    }
}

/// Draws an unfilled border inside a rectangle, the way a view draws its layer border.
///
/// The border covers the `thickness` outermost pixels of the area from `top_left`
/// (inclusive) to `bottom_right` (exclusive). Parts outside the image are clipped.
/// A border thicker than half the rectangle fills it.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y), inclusive.
/// * `bottom_right` - The bottom-right corner coordinates (x, y), exclusive.
/// * `color` - The color of the border.
/// * `thickness` - The width of the border in pixels.
pub fn draw_rect_border<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let x0 = min(top_left.0, bottom_right.0);
    let y0 = min(top_left.1, bottom_right.1);
    let x1 = max(top_left.0, bottom_right.0);
    let y1 = max(top_left.1, bottom_right.1);
    let t = thickness as i64;

    if x0 == x1 || y0 == y1 || t == 0 {
        return;
    }

    draw_filled_rect(img, (x0, y0), (x1, min(y0 + t, y1)), color); // top
    draw_filled_rect(img, (x0, max(y1 - t, y0)), (x1, y1), color); // bottom
    draw_filled_rect(img, (x0, y0), (min(x0 + t, x1), y1), color); // left
    draw_filled_rect(img, (max(x1 - t, x0), y0), (x1, y1), color); // right
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    #[test]
    fn test_draw_line() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_line(&mut img, (0, 0), (4, 4), [255], 1);
        assert_eq!(
            img.as_slice(),
            &[
                255,   0,   0,   0,   0,
                  0, 255,   0,   0,   0,
                  0,   0, 255,   0,   0,
                  0,   0,   0, 255,   0,
                  0,   0,   0,   0, 255,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_filled_rect_rgb() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val(
            ImageSize { width: 4, height: 3 }, 0u8,
        )?;
        draw_filled_rect(&mut img, (1, 0), (3, 2), [0, 0, 255]);
        assert_eq!(
            img.as_slice(),
            &[
                0, 0, 0,   0, 0, 255,   0, 0, 255,   0, 0, 0,
                0, 0, 0,   0, 0, 255,   0, 0, 255,   0, 0, 0,
                0, 0, 0,   0, 0,   0,   0, 0,   0,   0, 0, 0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_rect_border_inside_frame() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 6, height: 6 }, vec![0u8; 36],
        )?;
        draw_rect_border(&mut img, (0, 0), (6, 5), [9], 2);
        assert_eq!(
            img.as_slice(),
            &[
                9, 9, 9, 9, 9, 9,
                9, 9, 9, 9, 9, 9,
                9, 9, 0, 0, 9, 9,
                9, 9, 9, 9, 9, 9,
                9, 9, 9, 9, 9, 9,
                0, 0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_rect_border_clipped() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 4, height: 4 }, vec![0u8; 16],
        )?;
        // only the top-left part of the frame is visible
        draw_rect_border(&mut img, (-3, -3), (3, 3), [1], 1);
        assert_eq!(
            img.as_slice(),
            &[
                0, 0, 1, 0,
                0, 0, 1, 0,
                1, 1, 1, 0,
                0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_draw_rect_border_degenerate() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0u8; 9],
        )?;
        draw_rect_border(&mut img, (1, 1), (1, 3), [1], 1);
        assert!(img.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }
}
