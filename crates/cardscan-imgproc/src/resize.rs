use cardscan_geometry::PixelRect;
use cardscan_image::{Image, ImageError};

use crate::parallel;

/// Draws an image scaled into a rectangle of the destination using nearest neighbour sampling.
///
/// The rectangle is in destination pixel coordinates and may be larger than the destination or
/// partially outside of it; only the destination pixels whose centers fall inside the rectangle
/// are written. The remaining pixels are left untouched.
///
/// # Arguments
///
/// * `src` - The image to draw.
/// * `dst` - The image to draw into.
/// * `rect` - The area of `dst` covered by the whole of `src`.
///
/// # Errors
///
/// Returns an error if the source image is empty.
///
/// # Example
///
/// ```
/// use cardscan_geometry::PixelRect;
/// use cardscan_image::{Image, ImageSize};
/// use cardscan_imgproc::resize::resize_into_rect_nearest;
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![1, 2]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 2 }, 0).unwrap();
///
/// resize_into_rect_nearest(&src, &mut dst, PixelRect::new(0.0, 0.0, 4.0, 2.0)).unwrap();
/// assert_eq!(dst.as_slice(), &[1, 1, 2, 2, 1, 1, 2, 2]);
/// ```
pub fn resize_into_rect_nearest<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    rect: PixelRect,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.cols() == 0 || src.rows() == 0 {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    let valid = rect.width > 0.0
        && rect.height > 0.0
        && rect.x.is_finite()
        && rect.y.is_finite()
        && rect.width.is_finite()
        && rect.height.is_finite();

    if !valid || dst.cols() == 0 || dst.rows() == 0 {
        return Ok(());
    }

    let src_cols = src.cols();
    let src_rows = src.rows();
    let scale_x = src_cols as f64 / rect.width;
    let scale_y = src_rows as f64 / rect.height;
    let src_data = src.as_slice();

    parallel::par_iter_rows_mut(dst, |row, dst_row| {
        let cy = row as f64 + 0.5;
        if cy < rect.y || cy >= rect.max_y() {
            return;
        }
        let v = (((cy - rect.y) * scale_y) as usize).min(src_rows - 1);
        let src_row = &src_data[v * src_cols * C..(v + 1) * src_cols * C];

        dst_row
            .chunks_exact_mut(C)
            .enumerate()
            .for_each(|(col, dst_pixel)| {
                let cx = col as f64 + 0.5;
                if cx < rect.x || cx >= rect.max_x() {
                    return;
                }
                let u = (((cx - rect.x) * scale_x) as usize).min(src_cols - 1);
                dst_pixel.copy_from_slice(&src_row[u * C..(u + 1) * C]);
            });
    });

    Ok(())
}
