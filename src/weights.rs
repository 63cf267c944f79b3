//! Edge salience map computation.
//!
//! The weight map is built in five passes over a luminance copy of the image:
//! box blur, Laplacian edge filter, hard edge floor, 3x3 density smoothing and
//! normalization by the maximum. Every convolution uses a symmetric (mirror)
//! boundary, where the sample just outside the image repeats the edge sample.

use image::{ImageBuffer, Luma, Pixel, Primitive};
use imageproc::definitions::Image;
use num_traits::ToPrimitive;
use rayon::prelude::*;

use crate::error::{PolygonizeError, Result};

/// Per-pixel edge salience in `[0, 1]`, same extent as the source image.
pub type WeightMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Edge responses below this value are treated as noise and zeroed.
pub const EDGE_THRESHOLD: f32 = 3.0 / 256.0;

/// Laplacian-style edge kernel.
pub const LAPLACIAN_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, -8.0, 1.0, 1.0, 1.0, 1.0];

/// All-ones kernel accumulating nearby edge strength.
pub const DENSITY_KERNEL: [f32; 9] = [1.0; 9];

/// Computes the edge weight map of an image.
///
/// # Arguments
///
/// * `image` - Source image, any pixel layout (gray, gray+alpha, RGB, RGBA)
/// * `blur_radius` - Radius of the square averaging kernel applied before edge
///   detection; the kernel side is `2 * blur_radius + 1`
///
/// # Returns
///
/// A [`WeightMap`] whose values lie in `[0, 1]` with at least one cell equal
/// to `1.0`.
///
/// # Errors
///
/// * [`PolygonizeError::EmptyImage`] if the image has no pixels
/// * [`PolygonizeError::EmptyEdgeMap`] if no edge response survives the
///   [`EDGE_THRESHOLD`] floor, e.g. for a flat image
///
/// # Algorithm
///
/// 1. Perceptual grayscale conversion scaled to `[0, 1]`
/// 2. Box blur of side `2 * blur_radius + 1`
/// 3. Convolution with [`LAPLACIAN_KERNEL`]
/// 4. Values below [`EDGE_THRESHOLD`] set to zero
/// 5. Convolution with [`DENSITY_KERNEL`]
/// 6. Division by the map maximum
///
/// # Examples
///
/// ```rust
/// use image::{GrayImage, Luma};
/// use lowpoly_polygonize::edge_weights;
///
/// let image = GrayImage::from_fn(16, 16, |x, _| if x < 8 { Luma([0u8]) } else { Luma([255u8]) });
/// let weights = edge_weights(&image, 2).unwrap();
/// assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
/// ```
pub fn edge_weights<P>(image: &Image<P>, blur_radius: u32) -> Result<WeightMap>
where
    P: Pixel,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PolygonizeError::EmptyImage);
    }
    debug!("edge weights for {}x{} image", width, height);

    let gray = grayscale(image);

    let side = 2 * blur_radius + 1;
    let blurred = convolve_symmetric(&gray, &box_kernel(blur_radius), side);
    debug!("blurred with {}x{} box kernel", side, side);

    let mut edge = convolve_symmetric(&blurred, &LAPLACIAN_KERNEL, 3);
    let edge_values: &mut [f32] = &mut edge;
    edge_values.par_iter_mut().for_each(|value| {
        if *value < EDGE_THRESHOLD {
            *value = 0.0;
        }
    });

    let mut dense = convolve_symmetric(&edge, &DENSITY_KERNEL, 3);

    let max = dense.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return Err(PolygonizeError::EmptyEdgeMap);
    }
    let dense_values: &mut [f32] = &mut dense;
    dense_values.par_iter_mut().for_each(|value| *value /= max);
    debug!("weight map normalized, max response {}", max);

    Ok(dense)
}

/// Converts an image to single-channel luminance in `[0, 1]`.
///
/// Pixels with three or more channels use `0.2125 R + 0.7154 G + 0.0721 B`;
/// alpha is ignored. Gray pixels use their first channel. Values are divided by
/// the default maximum of the subpixel type (255 for `u8`, 1.0 for `f32`).
pub fn grayscale<P>(image: &Image<P>) -> ImageBuffer<Luma<f32>, Vec<f32>>
where
    P: Pixel,
{
    let scale = <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE
        .to_f32()
        .unwrap_or(1.0);
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        Luma([luminance(image.get_pixel(x, y)) / scale])
    })
}

fn luminance<P: Pixel>(pixel: &P) -> f32 {
    let channels = pixel.channels();
    let channel = |i: usize| channels[i].to_f32().unwrap_or(0.0);
    if channels.len() >= 3 {
        0.2125 * channel(0) + 0.7154 * channel(1) + 0.0721 * channel(2)
    } else {
        channel(0)
    }
}

/// Square averaging kernel of side `2 * radius + 1`, each cell `1 / side²`.
fn box_kernel(radius: u32) -> Vec<f32> {
    let side = (2 * radius + 1) as usize;
    vec![1.0 / (side * side) as f32; side * side]
}

/// Maps a possibly out-of-range index onto `0..len` by mirroring across the
/// borders with the edge sample repeated (`-1 -> 0`, `len -> len - 1`).
pub(crate) fn symmetric_index(i: i64, len: usize) -> usize {
    let len = len as i64;
    let period = 2 * len;
    let r = i.rem_euclid(period);
    if r < len {
        r as usize
    } else {
        (period - 1 - r) as usize
    }
}

/// Convolves a float image with a square `side x side` kernel using a symmetric
/// boundary. Rows are processed in parallel.
///
/// All kernels used here are point-symmetric, so the kernel is applied without
/// flipping.
fn convolve_symmetric(
    src: &ImageBuffer<Luma<f32>, Vec<f32>>,
    kernel: &[f32],
    side: u32,
) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let (width, height) = src.dimensions();
    let radius = (side / 2) as i64;
    let side = side as i64;
    let row_len = width as usize;
    let pixels = src.as_raw();

    let mut out: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::new(width, height);
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row): (usize, &mut [f32])| {
            for (x, value) in row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for ky in 0..side {
                    let sy = symmetric_index(y as i64 + ky - radius, height as usize);
                    let src_row = &pixels[sy * row_len..(sy + 1) * row_len];
                    for kx in 0..side {
                        let sx = symmetric_index(x as i64 + kx - radius, row_len);
                        acc += src_row[sx] * kernel[(ky * side + kx) as usize];
                    }
                }
                *value = acc;
            }
        });
    out
}
