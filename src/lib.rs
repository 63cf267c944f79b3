//! # Low-Poly Polygonization Library
//!
//! This crate turns a raster image into a "low-poly" rendering: visually salient
//! points are located from an edge map, triangulated with a Delaunay
//! triangulation, and every triangle is repainted with the mean color of the
//! pixels it covers.
//!
//! ## Features
//!
//! - Edge salience map (blur, Laplacian, edge floor, density smoothing) with
//!   parallel row convolution
//! - Reproducible threshold sampling from a fixed seed
//! - Delaunay triangulation of the sampled points plus the image corners
//! - Flat-color triangle rendering on a 2x canvas with nearest-neighbour reduction
//! - Point and mesh visualization utilities
//! - Optional debug logging (enable with `logger` feature)
//!
//! The library works on in-memory `image` buffers only and performs no I/O.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use image::open;
//! use lowpoly_polygonize::{Polygonizer, DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD};
//!
//! let image = open("example.png").unwrap().to_rgb8();
//! let polygonizer = Polygonizer::default();
//!
//! let triangles = polygonizer
//!     .polygonize(&image, DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD)
//!     .unwrap();
//! let lowpoly = polygonizer.render(&image, &triangles).unwrap();
//! lowpoly.save("lowpoly.png").unwrap();
//!
//! println!("Rendered {} triangles", triangles.len());
//! ```
//!
//! ## Optional Features
//!
//! ### Logger Feature
//!
//! Enable debug logging to follow the pipeline stages:
//!
//! ```toml
//! [dependencies]
//! lowpoly-polygonize = { version = "0.1.0", features = ["logger"] }
//! log = "0.4"
//! env_logger = "0.11"
//! ```
//!
//! ```rust,no_run
//! use image::open;
//! use lowpoly_polygonize::Polygonizer;
//!
//! env_logger::init();
//!
//! let image = open("example.png").unwrap().to_rgb8();
//! let lowpoly = Polygonizer::new(42).lowpoly(&image, 800, 0.05).unwrap();
//! // With logger feature, you'll see debug messages like:
//! // DEBUG lowpoly_polygonize::weights: edge weights for 640x480 image
//! // DEBUG lowpoly_polygonize::sampling: 21873 candidates at threshold 0.05
//! // DEBUG lowpoly_polygonize::triangulation: 804 points triangulated into 1590 triangles
//! ```
//!
//! ## Stage by Stage
//!
//! ```rust,no_run
//! use image::open;
//! use lowpoly_polygonize::{add_corners, edge_weights, render, triangulate, PointSampler};
//!
//! let image = open("example.png").unwrap().to_rgb8();
//! let weights = edge_weights(&image, 2).unwrap();
//! let points = PointSampler::new(1234).sample(&weights, 1000, 0.02).unwrap();
//! let points = add_corners(points, image.width(), image.height());
//! let triangles = triangulate(&points).unwrap();
//! let lowpoly = render(&image, &triangles).unwrap();
//! ```

use image::Pixel;
use imageproc::definitions::Image;

// Conditional logging macros
#[cfg(feature = "logger")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(feature = "logger"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod error;
mod render;
mod sampling;
mod triangulation;
mod visualize;
mod weights;

pub use error::{PolygonizeError, Result};
pub use render::{mean_color, render, triangle_pixels, SUPERSAMPLE};
pub use sampling::{add_corners, Coord, PointSampler};
pub use triangulation::{triangulate, Triangle};
pub use visualize::{visualize_points, visualize_triangles};
pub use weights::{
    edge_weights, grayscale, WeightMap, DENSITY_KERNEL, EDGE_THRESHOLD, LAPLACIAN_KERNEL,
};

/// Default number of sampled points.
pub const DEFAULT_MAX_POINTS: usize = 1000;
/// Default minimum weight for a sampling candidate.
pub const DEFAULT_THRESHOLD: f32 = 0.02;
/// Default sampling seed.
pub const DEFAULT_SEED: u64 = 1234;
/// Default radius of the box blur applied before edge detection.
pub const DEFAULT_BLUR_RADIUS: u32 = 2;

/// Image-to-triangles pipeline with a fixed sampling seed.
///
/// The seed and blur radius are set at construction; the point budget and
/// threshold are chosen per call. A `Polygonizer` holds no mutable state, so
/// one instance can serve any number of calls (or threads) and always returns
/// the same triangles for the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polygonizer {
    sampler: PointSampler,
    blur_radius: u32,
}

impl Default for Polygonizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Polygonizer {
    pub fn new(seed: u64) -> Self {
        Self {
            sampler: PointSampler::new(seed),
            blur_radius: DEFAULT_BLUR_RADIUS,
        }
    }

    pub fn with_blur_radius(mut self, blur_radius: u32) -> Self {
        self.blur_radius = blur_radius;
        self
    }

    pub fn seed(&self) -> u64 {
        self.sampler.seed()
    }

    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    /// Splits `image` into triangles anchored on salient points.
    ///
    /// # Arguments
    ///
    /// * `image` - Source image
    /// * `max_points` - Number of points drawn from the weight map; the four
    ///   image corners are added on top
    /// * `threshold` - Minimum weight in `[0, 1]` for a sampling candidate
    ///
    /// # Returns
    ///
    /// The Delaunay triangles over the sampled points and corners, with
    /// `(row, col)` vertices.
    ///
    /// # Errors
    ///
    /// * [`PolygonizeError::EmptyImage`] for an image without pixels
    /// * [`PolygonizeError::InvalidThreshold`] for a threshold outside `[0, 1]`
    /// * [`PolygonizeError::EmptyEdgeMap`] when the image has no edges
    /// * [`PolygonizeError::InsufficientCandidates`] when fewer than
    ///   `max_points` cells reach `threshold`
    /// * [`PolygonizeError::DegenerateGeometry`] when the points cannot be
    ///   triangulated, e.g. for a single-row image
    ///
    /// # Examples
    ///
    /// ```rust
    /// use image::{GrayImage, Luma};
    /// use lowpoly_polygonize::Polygonizer;
    ///
    /// let image = GrayImage::from_pixel(4, 4, Luma([90u8]));
    /// let triangles = Polygonizer::default().polygonize(&image, 0, 0.02).unwrap();
    /// assert_eq!(triangles.len(), 2);
    /// ```
    pub fn polygonize<P: Pixel>(
        &self,
        image: &Image<P>,
        max_points: usize,
        threshold: f32,
    ) -> Result<Vec<Triangle>> {
        let points = self.sample_points(image, max_points, threshold)?;
        triangulate(&points)
    }

    /// Samples `max_points` salient coordinates and appends the image corners.
    ///
    /// With `max_points == 0` the weight map is not computed, so images without
    /// any edge still yield their four corners.
    pub fn sample_points<P: Pixel>(
        &self,
        image: &Image<P>,
        max_points: usize,
        threshold: f32,
    ) -> Result<Vec<Coord>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PolygonizeError::EmptyImage);
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PolygonizeError::InvalidThreshold(threshold));
        }

        let sampled = if max_points == 0 {
            Vec::new()
        } else {
            let weights = edge_weights(image, self.blur_radius)?;
            self.sampler.sample(&weights, max_points, threshold)?
        };
        debug!("sampled {} points", sampled.len());
        Ok(add_corners(sampled, width, height))
    }

    /// Paints each triangle with the mean color of the source pixels it covers.
    ///
    /// See [`render`] for the details.
    pub fn render<P>(&self, image: &Image<P>, triangles: &[Triangle]) -> Result<Image<P>>
    where
        P: Pixel + Send + Sync,
        P::Subpixel: Send + Sync,
    {
        render::render(image, triangles)
    }

    /// Polygonizes and renders `image` in one call.
    pub fn lowpoly<P>(&self, image: &Image<P>, max_points: usize, threshold: f32) -> Result<Image<P>>
    where
        P: Pixel + Send + Sync,
        P::Subpixel: Send + Sync,
    {
        let triangles = self.polygonize(image, max_points, threshold)?;
        self.render(image, &triangles)
    }
}
