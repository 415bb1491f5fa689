use cardscan_image::{Image, ImageError};

use crate::{histogram::compute_histogram, parallel};

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `threshold` - The threshold value.
/// * `max_value` - The value written when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use cardscan_image::{Image, ImageSize};
/// use cardscan_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    threshold: u8,
    max_value: u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold { max_value } else { 0 };
    });

    Ok(())
}

/// Compute the threshold that best separates the two intensity classes of an image.
///
/// Uses Otsu's method: the returned value maximizes the between-class variance of the
/// pixels `<= threshold` and `> threshold`. A constant image returns its only intensity.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
///
/// # Returns
///
/// The threshold to pass to [`threshold_binary`].
pub fn otsu_threshold(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    let mut hist = vec![0usize; 256];
    compute_histogram(src, &mut hist, 256)?;

    let total = src.as_slice().len() as f64;
    let sum_total = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum::<f64>();

    let mut best_threshold = 0u8;
    let mut best_variance = -1.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }

        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            if best_variance < 0.0 {
                // single intensity
                best_threshold = t as u8;
            }
            break;
        }

        sum_bg += t as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_total - sum_bg) / weight_fg;

        let variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    Ok(best_threshold)
}

/// Binarize an image with the threshold computed by [`otsu_threshold`].
///
/// Pixels above the threshold are set to 255, the others to 0.
///
/// # Returns
///
/// The threshold that was applied.
pub fn threshold_otsu(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<u8, ImageError> {
    let threshold = otsu_threshold(src)?;
    threshold_binary(src, dst, threshold, 255)?;
    Ok(threshold)
}
