//! Flat-color triangle rendering.
//!
//! Triangles are painted on a canvas at twice the source resolution and the
//! canvas is reduced back with nearest-neighbour sampling, which smooths the
//! seams between neighbouring triangles compared with painting at native size.

use image::{ImageBuffer, Pixel};
use imageproc::definitions::Image;
use num_traits::{NumCast, ToPrimitive};
use rayon::prelude::*;

use crate::error::{PolygonizeError, Result};
use crate::sampling::Coord;
use crate::triangulation::{doubled_signed_area, Triangle};

/// Linear scale of the working canvas relative to the source image.
pub const SUPERSAMPLE: u32 = 2;

/// Renders a low-poly version of `image` from `triangles`.
///
/// # Arguments
///
/// * `image` - Source image providing the colors
/// * `triangles` - Triangles with `(row, col)` vertices in source pixel space
///
/// # Returns
///
/// An image with the dimensions and pixel type of `image`, each triangle filled
/// with the mean color of the source pixels it covers.
///
/// # Algorithm
///
/// 1. Allocate a zeroed canvas of `SUPERSAMPLE` times the source size
/// 2. For every triangle, average the source pixels inside it (in parallel)
/// 3. Paint each scaled triangle in input order; later triangles overwrite
///    shared boundary pixels
/// 4. Downsample the canvas with nearest-neighbour sampling
///
/// Pixels outside every triangle keep the zero canvas value. When the
/// triangulation includes the four image corners every pixel is covered.
///
/// # Errors
///
/// [`PolygonizeError::EmptyImage`] if the image has no pixels.
pub fn render<P>(image: &Image<P>, triangles: &[Triangle]) -> Result<Image<P>>
where
    P: Pixel + Send + Sync,
    P::Subpixel: Send + Sync,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PolygonizeError::EmptyImage);
    }

    // Mean colors are independent per triangle; painting stays sequential so
    // the overwrite order is the input order.
    let colors: Vec<Option<P>> = triangles
        .par_iter()
        .map(|triangle| mean_color(image, &triangle_pixels(triangle, 1, height, width)))
        .collect();
    debug!("mean colors for {} triangles", colors.len());

    let mut canvas: Image<P> = ImageBuffer::new(width * SUPERSAMPLE, height * SUPERSAMPLE);
    for (triangle, color) in triangles.iter().zip(colors) {
        let Some(color) = color else {
            debug!("triangle {:?} covers no source pixel, skipped", triangle);
            continue;
        };
        for (row, col) in triangle_pixels(triangle, SUPERSAMPLE, canvas.height(), canvas.width()) {
            canvas.put_pixel(col, row, color);
        }
    }

    Ok(downsample_nearest(&canvas, width, height))
}

/// Rasterizes a triangle scaled by `scale` onto a `rows x cols` grid.
///
/// A grid position is inside when it lies within the triangle or on one of its
/// edges. Positions outside the grid are clipped. Zero-area triangles cover
/// nothing.
///
/// # Examples
///
/// ```rust
/// use lowpoly_polygonize::triangle_pixels;
///
/// let pixels = triangle_pixels(&[(0, 0), (0, 2), (2, 0)], 1, 10, 10);
/// assert_eq!(pixels.len(), 6);
/// ```
pub fn triangle_pixels(triangle: &Triangle, scale: u32, rows: u32, cols: u32) -> Vec<Coord> {
    if rows == 0 || cols == 0 || doubled_signed_area(triangle) == 0 {
        return Vec::new();
    }
    let scale = scale as i64;
    let vertices = triangle.map(|(r, c)| (r as i64 * scale, c as i64 * scale));

    let row_min = vertices.iter().map(|v| v.0).min().unwrap_or(0).max(0);
    let row_max = vertices.iter().map(|v| v.0).max().unwrap_or(0).min(rows as i64 - 1);
    let col_min = vertices.iter().map(|v| v.1).min().unwrap_or(0).max(0);
    let col_max = vertices.iter().map(|v| v.1).max().unwrap_or(0).min(cols as i64 - 1);

    let edge = |a: (i64, i64), b: (i64, i64), p: (i64, i64)| {
        (b.1 - a.1) * (p.0 - a.0) - (b.0 - a.0) * (p.1 - a.1)
    };
    let [v0, v1, v2] = vertices;

    let mut pixels = Vec::new();
    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let p = (row, col);
            let (e0, e1, e2) = (edge(v0, v1, p), edge(v1, v2, p), edge(v2, v0, p));
            let inside = (e0 >= 0 && e1 >= 0 && e2 >= 0) || (e0 <= 0 && e1 <= 0 && e2 <= 0);
            if inside {
                pixels.push((row as u32, col as u32));
            }
        }
    }
    pixels
}

/// Per-channel arithmetic mean of the pixels at `coords`, cast back to the
/// subpixel type by truncation. `None` for an empty coordinate list.
pub fn mean_color<P: Pixel>(image: &Image<P>, coords: &[Coord]) -> Option<P> {
    let &(first_row, first_col) = coords.first()?;
    let mut sums = vec![0.0f64; P::CHANNEL_COUNT as usize];
    for &(row, col) in coords {
        for (sum, value) in sums.iter_mut().zip(image.get_pixel(col, row).channels()) {
            *sum += value.to_f64().unwrap_or(0.0);
        }
    }

    let count = coords.len() as f64;
    let mut color = *image.get_pixel(first_col, first_row);
    for (channel, sum) in color.channels_mut().iter_mut().zip(sums) {
        if let Some(mean) = <P::Subpixel as NumCast>::from(sum / count) {
            *channel = mean;
        }
    }
    Some(color)
}

/// Nearest-neighbour resize where destination index `d` reads source index
/// `floor(d * src_len / dst_len)`.
fn downsample_nearest<P: Pixel>(src: &Image<P>, width: u32, height: u32) -> Image<P> {
    let (src_width, src_height) = src.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let sx = (x as u64 * src_width as u64 / width as u64) as u32;
        let sy = (y as u64 * src_height as u64 / height as u64) as u32;
        *src.get_pixel(sx, sy)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::collections::HashSet;

    #[test]
    fn rasterization_includes_edges_and_vertices() {
        let pixels = triangle_pixels(&[(0, 0), (0, 3), (3, 0)], 1, 8, 8);
        let got: HashSet<Coord> = pixels.into_iter().collect();
        let expected: HashSet<Coord> = (0..=3u32)
            .flat_map(|r| (0..=3 - r).map(move |c| (r, c)))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn rasterization_ignores_winding_and_clips() {
        let cw = triangle_pixels(&[(0, 0), (3, 0), (0, 3)], 1, 8, 8);
        let ccw = triangle_pixels(&[(0, 0), (0, 3), (3, 0)], 1, 8, 8);
        assert_eq!(cw.len(), ccw.len());

        let clipped = triangle_pixels(&[(0, 0), (0, 3), (3, 0)], 2, 4, 4);
        assert!(clipped.iter().all(|&(r, c)| r < 4 && c < 4));
        assert!(triangle_pixels(&[(1, 1), (2, 2), (3, 3)], 1, 8, 8).is_empty());
    }

    #[test]
    fn mean_color_averages_channels() {
        let image: RgbImage = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([10u8, 20, 31])
            } else {
                Rgb([30, 40, 50])
            }
        });
        // Blue averages to 40.5 and is truncated.
        assert_eq!(mean_color(&image, &[(0, 0), (0, 1)]), Some(Rgb([20, 30, 40])));
        assert_eq!(mean_color::<Rgb<u8>>(&image, &[]), None);
    }

    #[test]
    fn uniform_region_renders_its_exact_color() {
        let color = Rgb([13u8, 200, 77]);
        let image: RgbImage = ImageBuffer::from_fn(12, 12, |x, y| {
            if x < 8 && y < 8 {
                color
            } else {
                Rgb([250, 0, 0])
            }
        });
        let triangle: Triangle = [(1, 1), (1, 6), (6, 1)];
        let out = render(&image, &[triangle]).unwrap();
        for (row, col) in triangle_pixels(&triangle, 1, 12, 12) {
            assert_eq!(*out.get_pixel(col, row), color);
        }
    }

    #[test]
    fn later_triangles_overwrite_shared_edges() {
        let image = GrayImage::from_fn(5, 5, |x, y| Luma([if x + y <= 4 { 10u8 } else { 90u8 }]));
        let upper: Triangle = [(0, 0), (0, 4), (4, 0)];
        let lower: Triangle = [(0, 4), (4, 4), (4, 0)];
        let out = render(&image, &[upper, lower]).unwrap();

        // The anti-diagonal belongs to both triangles and takes the lower
        // triangle's color.
        let lower_color = out.get_pixel(4, 4)[0];
        assert_eq!(out.get_pixel(2, 2)[0], lower_color);
        assert_eq!(out.get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn uncovered_pixels_stay_zero() {
        let image = GrayImage::from_pixel(6, 6, Luma([120u8]));
        let out = render(&image, &[[(0, 0), (0, 2), (2, 0)]]).unwrap();
        assert_eq!(out.get_pixel(0, 0)[0], 120);
        assert_eq!(out.get_pixel(5, 5)[0], 0);
    }

    #[test]
    fn downsample_reads_even_canvas_pixels() {
        let canvas = GrayImage::from_fn(8, 6, |x, y| Luma([(y * 8 + x) as u8]));
        let small = downsample_nearest(&canvas, 4, 3);
        assert_eq!(small.dimensions(), (4, 3));
        assert_eq!(small.get_pixel(1, 1)[0], 2 * 8 + 2);
        assert_eq!(small.get_pixel(3, 2)[0], 4 * 8 + 6);
    }
}
