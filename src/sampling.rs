//! Threshold filtering and uniform random sampling of salient coordinates.

use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::error::{PolygonizeError, Result};
use crate::weights::WeightMap;

/// Pixel coordinate as `(row, col)`.
pub type Coord = (u32, u32);

/// Draws salient coordinates from a [`WeightMap`].
///
/// The sampler holds only its seed. Every call to [`PointSampler::sample`]
/// builds a fresh generator from that seed, so repeated calls with the same
/// arguments return the same points in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSampler {
    seed: u64,
}

impl PointSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Samples `max_points` distinct coordinates whose weight is at least
    /// `threshold`.
    ///
    /// Candidates are enumerated in row-major order and drawn uniformly without
    /// replacement; how far a weight exceeds the threshold does not change its
    /// chance of being picked.
    ///
    /// # Errors
    ///
    /// * [`PolygonizeError::InvalidThreshold`] if `threshold` is not in `[0, 1]`
    /// * [`PolygonizeError::InsufficientCandidates`] if fewer than `max_points`
    ///   cells pass the threshold
    pub fn sample(&self, weights: &WeightMap, max_points: usize, threshold: f32) -> Result<Vec<Coord>> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PolygonizeError::InvalidThreshold(threshold));
        }

        let candidates: Vec<Coord> = weights
            .enumerate_pixels()
            .filter(|(_, _, w)| w[0] >= threshold)
            .map(|(x, y, _)| (y, x))
            .collect();
        debug!("{} candidates at threshold {}", candidates.len(), threshold);

        if candidates.len() < max_points {
            return Err(PolygonizeError::InsufficientCandidates {
                requested: max_points,
                available: candidates.len(),
                threshold,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(index::sample(&mut rng, candidates.len(), max_points)
            .into_iter()
            .map(|i| candidates[i])
            .collect())
    }
}

/// Appends the four corners of a `width x height` image to `points`.
///
/// Corners are added as `(0, 0)`, `(0, width - 1)`, `(height - 1, 0)` and
/// `(height - 1, width - 1)`, without deduplication against sampled points.
pub fn add_corners(mut points: Vec<Coord>, width: u32, height: u32) -> Vec<Coord> {
    let last_row = height.saturating_sub(1);
    let last_col = width.saturating_sub(1);
    points.extend([(0, 0), (0, last_col), (last_row, 0), (last_row, last_col)]);
    points
}
