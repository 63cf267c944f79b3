//! Debug overlays for sampled points and triangulations.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};

use crate::sampling::Coord;
use crate::triangulation::Triangle;

/// Draws the edges of `triangles` in red over a copy of `image`.
///
/// Useful for inspecting how the sampled points follow image contours.
///
/// ```rust,no_run
/// use image::open;
/// use lowpoly_polygonize::{visualize_triangles, Polygonizer};
///
/// let image = open("input.png").unwrap().to_rgb8();
/// let triangles = Polygonizer::default().polygonize(&image, 500, 0.02).unwrap();
/// visualize_triangles(&image, &triangles).save("mesh.png").unwrap();
/// ```
pub fn visualize_triangles(image: &RgbImage, triangles: &[Triangle]) -> RgbImage {
    let mut canvas = image.clone();
    let red = Rgb([255u8, 0, 0]);
    for triangle in triangles {
        for i in 0..3 {
            let (r0, c0) = triangle[i];
            let (r1, c1) = triangle[(i + 1) % 3];
            draw_line_segment_mut(&mut canvas, (c0 as f32, r0 as f32), (c1 as f32, r1 as f32), red);
        }
    }
    canvas
}

/// Marks every point with a small red cross over a copy of `image`.
pub fn visualize_points(image: &RgbImage, points: &[Coord]) -> RgbImage {
    let mut canvas = image.clone();
    let red = Rgb([255u8, 0, 0]);
    for &(row, col) in points {
        draw_cross_mut(&mut canvas, red, col as i32, row as i32);
    }
    canvas
}
