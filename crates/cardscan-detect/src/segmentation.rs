use std::collections::HashMap;

use cardscan_geometry::Point2;
use cardscan_image::Image;

use crate::{errors::DetectError, union_find::UnionFind};

/// Value of a foreground pixel in the binary image.
pub const FOREGROUND: u8 = 255;

/// A connected region of equally valued pixels in a binary image.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Representative pixel index of the region.
    pub label: usize,
    /// Number of pixels in the region.
    pub pixel_count: usize,
    /// Inclusive pixel bounds of the region as `[min_x, min_y, max_x, max_y]`.
    pub bounds: [usize; 4],
    /// Whether the region reaches the first or last row or column of the image.
    pub touches_border: bool,
    /// Pixels of the region with at least one 4-neighbour of the other value, as `(x, y)`.
    pub boundary: Vec<(usize, usize)>,
    /// Midpoints of the pixel sides shared with the other value, in pixel coordinates.
    pub edge_points: Vec<Point2>,
}

/// Finds connected components in a binary image using union-find.
///
/// Foreground pixels are 8-connected and background pixels 4-connected, so that a
/// closed foreground outline always separates the background inside from the outside.
///
/// # Arguments
///
/// * `src` - A binary image with [`FOREGROUND`] and `0` pixels.
/// * `uf` - The union-find structure to fill, with one element per pixel.
pub fn find_connected_components(
    src: &Image<u8, 1>,
    uf: &mut UnionFind,
) -> Result<(), DetectError> {
    let src_size = src.size();
    let src_data = src.as_slice();

    if uf.len() != src_data.len() {
        return Err(DetectError::BufferSizeMismatch(uf.len(), src_data.len()));
    }

    src_data.iter().enumerate().for_each(|(i, &pixel)| {
        let row_y = i / src_size.width;
        let row_x = i % src_size.width;
        let is_foreground = pixel == FOREGROUND;

        if row_x + 1 < src_size.width {
            // right pixel exists
            if pixel == src_data[i + 1] {
                uf.connect(i, i + 1);
            }

            if is_foreground && row_y > 0 {
                // upper-right diagonal exists
                let dig_i = i - src_size.width + 1;

                if pixel == src_data[dig_i] {
                    uf.connect(i, dig_i);
                }
            }
        }

        if is_foreground && row_x > 0 && row_y > 0 {
            // upper-left diagonal exists
            let dig_i = i - src_size.width - 1;

            if pixel == src_data[dig_i] {
                uf.connect(i, dig_i);
            }
        }

        if row_y + 1 < src_size.height {
            // bottom pixel exists
            let adj_i = i + src_size.width;

            if pixel == src_data[adj_i] {
                uf.connect(i, adj_i);
            }
        }
    });

    Ok(())
}

/// Gathers the statistics and the boundary of every component with at least `min_pixels` pixels.
///
/// # Arguments
///
/// * `src` - The binary image the components were computed on.
/// * `uf` - The union-find filled by [`find_connected_components`].
/// * `min_pixels` - Smaller components are skipped.
///
/// # Returns
///
/// The components sorted by decreasing pixel count, then by label.
pub fn collect_components(
    src: &Image<u8, 1>,
    uf: &mut UnionFind,
    min_pixels: usize,
) -> Vec<Component> {
    let width = src.width();
    let height = src.height();
    let src_data = src.as_slice();

    let mut components: HashMap<usize, Component> = HashMap::new();

    for (i, &pixel) in src_data.iter().enumerate() {
        let label = uf.get_representative(i);
        let pixel_count = uf.set_size(label);
        if pixel_count < min_pixels {
            continue;
        }

        let x = i % width;
        let y = i / width;

        let component = components.entry(label).or_insert_with(|| Component {
            label,
            pixel_count,
            bounds: [x, y, x, y],
            touches_border: false,
            boundary: Vec::new(),
            edge_points: Vec::new(),
        });

        component.bounds[0] = component.bounds[0].min(x);
        component.bounds[1] = component.bounds[1].min(y);
        component.bounds[2] = component.bounds[2].max(x);
        component.bounds[3] = component.bounds[3].max(y);

        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            component.touches_border = true;
        }

        let (fx, fy) = (x as f64, y as f64);
        let sides = [
            (x > 0 && src_data[i - 1] != pixel, fx, fy + 0.5),
            (x + 1 < width && src_data[i + 1] != pixel, fx + 1.0, fy + 0.5),
            (y > 0 && src_data[i - width] != pixel, fx + 0.5, fy),
            (y + 1 < height && src_data[i + width] != pixel, fx + 0.5, fy + 1.0),
        ];

        let mut differs = false;
        for (other, ex, ey) in sides {
            if other {
                component.edge_points.push(Point2::new(ex, ey));
                differs = true;
            }
        }

        if differs {
            component.boundary.push((x, y));
        }
    }

    let mut components = components.into_values().collect::<Vec<_>>();
    components.sort_by(|a, b| {
        b.pixel_count
            .cmp(&a.pixel_count)
            .then(a.label.cmp(&b.label))
    });

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_image::{ImageError, ImageSize};

    #[rustfmt::skip]
    fn ring() -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize { width: 6, height: 6 },
            vec![
                0,   0,   0,   0,   0, 0,
                0, 255, 255, 255, 255, 0,
                0, 255,   0,   0, 255, 0,
                0, 255,   0,   0, 255, 0,
                0, 255, 255, 255, 255, 0,
                0,   0,   0,   0,   0, 0,
            ],
        )
    }

    #[test]
    fn test_components_of_ring() -> Result<(), Box<dyn std::error::Error>> {
        let src = ring()?;
        let mut uf = UnionFind::new(src.size().area());
        find_connected_components(&src, &mut uf)?;

        let components = collect_components(&src, &mut uf, 1);
        assert_eq!(components.len(), 3);

        // outer background, ring, hole
        assert_eq!(components[0].pixel_count, 20);
        assert!(components[0].touches_border);

        assert_eq!(components[1].pixel_count, 12);
        assert!(!components[1].touches_border);
        assert_eq!(components[1].bounds, [1, 1, 4, 4]);
        assert_eq!(components[1].boundary.len(), 12);
        // 16 sides on the outer outline, 8 around the hole
        assert_eq!(components[1].edge_points.len(), 24);
        assert!(components[1].edge_points.contains(&Point2::new(1.0, 1.5)));
        assert!(components[1].edge_points.contains(&Point2::new(2.5, 2.0)));

        assert_eq!(components[2].pixel_count, 4);
        assert_eq!(components[2].bounds, [2, 2, 3, 3]);
        assert_eq!(components[2].edge_points.len(), 8);

        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_diagonal_connectivity() -> Result<(), Box<dyn std::error::Error>> {
        let src = Image::new(
            ImageSize { width: 3, height: 3 },
            vec![
                255,   0,   0,
                  0, 255,   0,
                  0,   0, 255,
            ],
        )?;
        let mut uf = UnionFind::new(src.size().area());
        find_connected_components(&src, &mut uf)?;

        // foreground joins along the diagonal
        assert_eq!(uf.get_representative(0), uf.get_representative(8));
        // background does not cross it
        assert_ne!(uf.get_representative(1), uf.get_representative(3));

        Ok(())
    }

    #[test]
    fn test_min_pixels() -> Result<(), Box<dyn std::error::Error>> {
        let src = ring()?;
        let mut uf = UnionFind::new(src.size().area());
        find_connected_components(&src, &mut uf)?;

        let components = collect_components(&src, &mut uf, 5);
        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.pixel_count >= 5));

        Ok(())
    }

    #[test]
    fn test_union_find_size_mismatch() -> Result<(), Box<dyn std::error::Error>> {
        let src = ring()?;
        let mut uf = UnionFind::new(3);
        assert_eq!(
            find_connected_components(&src, &mut uf),
            Err(DetectError::BufferSizeMismatch(3, 36))
        );

        Ok(())
    }
}
