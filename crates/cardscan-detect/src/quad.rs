use cardscan_geometry::Point2;
use cardscan_image::ImageSize;

use crate::{segmentation::Component, DetectRectanglesConfig};

/// A quadrilateral fitted to a component, in pixel coordinates (origin top-left, y down).
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// The four corners of the quadrilateral.
    ///
    /// Order: [Top-left, Top-right, Bottom-right, Bottom-left]
    pub corners: [Point2; 4],
    /// Area enclosed by the corners, in square pixels.
    pub area: f64,
    /// How well the component is described by the quadrilateral, in [0, 1].
    pub confidence: f32,
}

impl Quad {
    /// Axis aligned bounds of the corners as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), c| {
                (min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
            },
        )
    }

    /// Mean length of the top and bottom edges, and of the left and right edges.
    pub fn side_lengths(&self) -> (f64, f64) {
        let [tl, tr, br, bl] = &self.corners;
        let width = (tl.distance(tr) + bl.distance(br)) / 2.0;
        let height = (tl.distance(bl) + tr.distance(br)) / 2.0;
        (width, height)
    }
}

#[inline]
fn cross(o: (i64, i64), a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Computes the convex hull of a set of integer points with the monotone chain algorithm.
///
/// Collinear points are dropped. The input is sorted and deduplicated in place.
///
/// # Returns
///
/// The hull vertices in counter-clockwise order for a y-up frame, i.e. clockwise on screen.
pub fn convex_hull(points: &mut Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    points.sort_unstable();
    points.dedup();

    if points.len() < 3 {
        return points.clone();
    }

    let mut hull: Vec<(i64, i64)> = Vec::with_capacity(2 * points.len());

    // lower hull
    for &p in points.iter() {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }

    // upper hull
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // the last point repeats the first one
    hull.pop();
    hull
}

/// Signed area of a polygon with the shoelace formula.
///
/// Positive for vertices listed clockwise on screen (y down).
pub fn signed_area(polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

/// Simplifies a closed polygon to `n` vertices by repeatedly removing the vertex that
/// spans the smallest triangle with its neighbours.
///
/// Polygons with `n` or fewer vertices are returned unchanged.
pub fn reduce_polygon(polygon: &[Point2], n: usize) -> Vec<Point2> {
    let mut vertices = polygon.to_vec();

    while vertices.len() > n.max(3) {
        let len = vertices.len();
        let (idx, _) = (0..len)
            .map(|i| {
                let prev = vertices[(i + len - 1) % len];
                let next = vertices[(i + 1) % len];
                let cur = vertices[i];
                let area = ((cur.x - prev.x) * (next.y - prev.y)
                    - (cur.y - prev.y) * (next.x - prev.x))
                    .abs();
                (i, area)
            })
            .fold((0, f64::MAX), |best, cur| if cur.1 < best.1 { cur } else { best });
        vertices.remove(idx);
    }

    vertices
}

/// Orders the corners of a convex quadrilateral as top-left, top-right, bottom-right, bottom-left.
pub fn order_corners(mut corners: [Point2; 4]) -> [Point2; 4] {
    if signed_area(&corners) < 0.0 {
        corners.reverse();
    }

    let start = corners
        .iter()
        .enumerate()
        .fold((0, f64::MAX), |best, (i, c)| {
            let key = c.x + c.y;
            if key < best.1 {
                (i, key)
            } else {
                best
            }
        })
        .0;

    corners.rotate_left(start);
    corners
}

/// Interior angle at `cur` in degrees.
fn corner_angle(prev: &Point2, cur: &Point2, next: &Point2) -> f64 {
    let (ax, ay) = (prev.x - cur.x, prev.y - cur.y);
    let (bx, by) = (next.x - cur.x, next.y - cur.y);
    let norm = (ax.hypot(ay) * bx.hypot(by)).max(f64::EPSILON);
    ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0).acos().to_degrees()
}

/// A line through `center` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// A point on the line.
    pub center: Point2,
    /// Unit vector perpendicular to the line.
    pub normal: Point2,
}

impl Line {
    /// Intersection with `other`, or `None` if the lines are nearly parallel.
    pub fn intersect(&self, other: &Line) -> Option<Point2> {
        let (a, b) = (self.normal, other.normal);
        let det = a.x * b.y - a.y * b.x;
        if det.abs() < 1e-9 {
            return None;
        }

        let c1 = a.x * self.center.x + a.y * self.center.y;
        let c2 = b.x * other.center.x + b.y * other.center.y;
        Some(Point2::new(
            (c1 * b.y - c2 * a.y) / det,
            (a.x * c2 - b.x * c1) / det,
        ))
    }
}

/// Least squares line through `points`, from the principal axis of their second moments.
///
/// Returns `None` for fewer than two distinct points.
pub fn fit_line(points: &[Point2]) -> Option<Line> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let ex = points.iter().map(|p| p.x).sum::<f64>() / n;
    let ey = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (cxx, cxy, cyy) = points.iter().fold((0.0, 0.0, 0.0), |(xx, xy, yy), p| {
        let (dx, dy) = (p.x - ex, p.y - ey);
        (xx + dx * dx, xy + dx * dy, yy + dy * dy)
    });

    // rows of (C - eig * I) for the largest eigenvalue are normal to the line
    let eig = 0.5 * (cxx + cyy + ((cxx - cyy) * (cxx - cyy) + 4.0 * cxy * cxy).sqrt());
    let (nx1, ny1) = (cxx - eig, cxy);
    let (nx2, ny2) = (cxy, cyy - eig);
    let (nx, ny) = if nx1 * nx1 + ny1 * ny1 > nx2 * nx2 + ny2 * ny2 {
        (nx1, ny1)
    } else {
        (nx2, ny2)
    };

    let length = nx.hypot(ny);
    if length < 1e-12 {
        return None;
    }

    Some(Line {
        center: Point2::new(ex, ey),
        normal: Point2::new(nx / length, ny / length),
    })
}

/// Moves the corners of a rough quad onto the intersections of lines fitted to its edges.
///
/// Edge points are assigned to the closest edge when they project onto its central part.
/// A corner keeps its rough position when one of its two lines cannot be fitted.
pub fn refine_corners(rough: &[Point2; 4], edge_points: &[Point2]) -> [Point2; 4] {
    let mut groups: [Vec<Point2>; 4] = Default::default();

    for p in edge_points {
        let mut best: Option<(usize, f64)> = None;

        for i in 0..4 {
            let a = rough[i];
            let b = rough[(i + 1) % 4];
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let len = dx.hypot(dy);
            if len <= 0.0 {
                continue;
            }

            let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (len * len);
            if !(0.1..=0.9).contains(&t) {
                continue;
            }

            let dist = ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len;
            if dist > (0.1 * len).max(2.0) {
                continue;
            }

            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }

        if let Some((i, _)) = best {
            groups[i].push(*p);
        }
    }

    let lines = [0, 1, 2, 3].map(|i| fit_line(&groups[i]));

    let mut corners = *rough;
    for (i, corner) in corners.iter_mut().enumerate() {
        if let (Some(prev), Some(next)) = (&lines[(i + 3) % 4], &lines[i]) {
            if let Some(p) = prev.intersect(next) {
                *corner = p;
            }
        }
    }

    corners
}

fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 <= 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(&Point2::new(a.x + t * dx, a.y + t * dy))
}

/// Fraction of `edge_points` lying within one pixel of the outline of `corners`.
pub fn outline_fit(corners: &[Point2; 4], edge_points: &[Point2]) -> f64 {
    if edge_points.is_empty() {
        return 0.0;
    }

    let close = edge_points
        .iter()
        .filter(|p| {
            (0..4).any(|i| distance_to_segment(p, &corners[i], &corners[(i + 1) % 4]) <= 1.0)
        })
        .count();

    close as f64 / edge_points.len() as f64
}

/// Fits a quadrilateral to a component and checks it against the configured constraints.
///
/// A rough quad is taken from the convex hull of the boundary pixel corners, then its
/// corners are refined with [`refine_corners`]. The confidence combines how much of the
/// component outline follows the quad with how well the quad area matches the pixel count.
///
/// # Arguments
///
/// * `component` - The component to fit.
/// * `config` - The rectangle constraints.
/// * `img_size` - The size of the analysed image, used by the minimum size constraint.
///
/// # Returns
///
/// The quad if every constraint holds, `None` otherwise.
pub fn fit_quad(
    component: &Component,
    config: &DetectRectanglesConfig,
    img_size: ImageSize,
) -> Option<Quad> {
    let min_dim = img_size.width.min(img_size.height) as f64;

    // the short side of a rectangle is never longer than the short side of its bounds
    let [min_x, min_y, max_x, max_y] = component.bounds;
    let extent = (max_x - min_x + 1).min(max_y - min_y + 1) as f64;
    if extent / min_dim < config.minimum_size as f64 {
        return None;
    }

    let mut points = Vec::with_capacity(component.boundary.len() * 4);
    for &(x, y) in &component.boundary {
        let (x, y) = (x as i64, y as i64);
        points.extend_from_slice(&[(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)]);
    }

    let hull = convex_hull(&mut points)
        .into_iter()
        .map(|(x, y)| Point2::new(x as f64, y as f64))
        .collect::<Vec<_>>();

    if hull.len() < 4 {
        return None;
    }

    let reduced = reduce_polygon(&hull, 4);
    let rough = order_corners([reduced[0], reduced[1], reduced[2], reduced[3]]);
    let corners = order_corners(refine_corners(&rough, &component.edge_points));

    let area = signed_area(&corners).abs();
    if area <= 0.0 {
        return None;
    }

    for i in 0..4 {
        let angle = corner_angle(&corners[(i + 3) % 4], &corners[i], &corners[(i + 1) % 4]);
        if (angle - 90.0).abs() > config.quadrature_tolerance as f64 {
            return None;
        }
    }

    let mut quad = Quad {
        corners,
        area,
        confidence: 0.0,
    };

    let (width, height) = quad.side_lengths();
    let (short, long) = (width.min(height), width.max(height));
    if long <= 0.0 {
        return None;
    }

    let aspect_ratio = short / long;
    if aspect_ratio < config.minimum_aspect_ratio as f64
        || aspect_ratio > config.maximum_aspect_ratio as f64
    {
        return None;
    }

    if short / min_dim < config.minimum_size as f64 {
        return None;
    }

    let pixels = component.pixel_count as f64;
    let fill = area.min(pixels) / area.max(pixels);
    quad.confidence = (outline_fit(&quad.corners, &component.edge_points) * fill) as f32;

    if quad.confidence < config.minimum_confidence {
        return None;
    }

    Some(quad)
}
