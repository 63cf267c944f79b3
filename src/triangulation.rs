//! Delaunay triangulation of sampled coordinates.

use delaunator::Point;

use crate::error::{PolygonizeError, Result};
use crate::sampling::Coord;

/// Three `(row, col)` vertices in the order produced by the triangulation.
/// Winding is not normalized.
pub type Triangle = [Coord; 3];

/// Triangulates `points` with an incremental Delaunay triangulation.
///
/// The triangles partition the convex hull of the input. Coincident points are
/// skipped by the triangulator, so a sampled point landing on an image corner
/// is harmless.
///
/// # Errors
///
/// [`PolygonizeError::DegenerateGeometry`] if there are fewer than three points
/// or every point lies on one line.
///
/// # Examples
///
/// ```rust
/// use lowpoly_polygonize::triangulate;
///
/// let square = [(0, 0), (0, 3), (3, 0), (3, 3)];
/// let triangles = triangulate(&square).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate(points: &[Coord]) -> Result<Vec<Triangle>> {
    let degenerate = || PolygonizeError::DegenerateGeometry {
        points: points.len(),
    };
    if points.len() < 3 {
        return Err(degenerate());
    }

    let vertices: Vec<Point> = points
        .iter()
        .map(|&(row, col)| Point {
            x: col as f64,
            y: row as f64,
        })
        .collect();
    let triangulation = delaunator::triangulate(&vertices);
    if triangulation.triangles.is_empty() {
        return Err(degenerate());
    }

    let triangles: Vec<Triangle> = triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| [points[t[0]], points[t[1]], points[t[2]]])
        .collect();
    debug!("{} points triangulated into {} triangles", points.len(), triangles.len());
    Ok(triangles)
}

/// Twice the signed area of a triangle, positive for counter-clockwise
/// vertices in (col, row) space.
pub(crate) fn doubled_signed_area(triangle: &Triangle) -> i64 {
    let [(r0, c0), (r1, c1), (r2, c2)] = triangle.map(|(r, c)| (r as i64, c as i64));
    (c1 - c0) * (r2 - r0) - (r1 - r0) * (c2 - c0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Doubled area of the convex hull via monotone chain.
    fn doubled_hull_area(points: &[Coord]) -> i64 {
        let mut pts: Vec<(i64, i64)> = points
            .iter()
            .map(|&(r, c)| (c as i64, r as i64))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        pts.sort_unstable();
        let cross = |o: (i64, i64), a: (i64, i64), b: (i64, i64)| {
            (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
        };
        let mut hull: Vec<(i64, i64)> = Vec::new();
        for pass in 0..2 {
            let start = hull.len();
            let iter: Box<dyn Iterator<Item = &(i64, i64)>> = if pass == 0 {
                Box::new(pts.iter())
            } else {
                Box::new(pts.iter().rev())
            };
            for &p in iter {
                while hull.len() >= start + 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
                    hull.pop();
                }
                hull.push(p);
            }
            hull.pop();
        }
        let n = hull.len();
        (0..n)
            .map(|i| {
                let (a, b) = (hull[i], hull[(i + 1) % n]);
                a.0 * b.1 - a.1 * b.0
            })
            .sum::<i64>()
            .abs()
    }

    fn scattered_points() -> Vec<Coord> {
        let mut points: Vec<Coord> = (0..40u32)
            .map(|i| ((i * 37 + 11) % 61 + 1, (i * 53 + 7) % 79 + 1))
            .collect();
        points.extend([(0, 0), (0, 80), (62, 0), (62, 80)]);
        points
    }

    #[test]
    fn square_corners_give_two_triangles() {
        let triangles = triangulate(&[(0, 0), (0, 3), (3, 0), (3, 3)]).unwrap();
        assert_eq!(triangles.len(), 2);
        let area: i64 = triangles.iter().map(|t| doubled_signed_area(t).abs()).sum();
        assert_eq!(area, 18);
    }

    #[test]
    fn triangles_cover_the_hull_without_overlap() {
        let points = scattered_points();
        let triangles = triangulate(&points).unwrap();

        // Summed triangle areas equal the hull area only when there are no gaps
        // and no overlapping interiors.
        let total: i64 = triangles.iter().map(|t| doubled_signed_area(t).abs()).sum();
        assert_eq!(total, doubled_hull_area(&points));

        let input: HashSet<Coord> = points.iter().copied().collect();
        assert!(triangles.iter().flatten().all(|v| input.contains(v)));
    }

    #[test]
    fn duplicate_corner_is_tolerated() {
        let points = vec![(0, 0), (2, 5), (0, 0), (0, 9), (7, 0), (7, 9)];
        let triangles = triangulate(&points).unwrap();
        let total: i64 = triangles.iter().map(|t| doubled_signed_area(t).abs()).sum();
        assert_eq!(total, 2 * 7 * 9);
    }

    #[test]
    fn degenerate_inputs_are_reported() {
        assert_eq!(
            triangulate(&[(0, 0), (1, 1)]),
            Err(PolygonizeError::DegenerateGeometry { points: 2 })
        );
        assert_eq!(
            triangulate(&[(0, 0), (1, 1), (2, 2), (5, 5)]),
            Err(PolygonizeError::DegenerateGeometry { points: 4 })
        );
        assert_eq!(
            triangulate(&[(3, 3), (3, 3), (3, 3)]),
            Err(PolygonizeError::DegenerateGeometry { points: 3 })
        );
    }
}
