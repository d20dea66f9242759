//! Uniform range sampling for spawn and motion state.
//!
//! Every random decision in the engine (spawn attributes, wander vectors,
//! resample intervals) goes through a [`Sampler`], so a seeded sampler makes
//! a whole simulation run reproducible.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random source backing the particle engine.
///
/// Wraps a [`SmallRng`]; cheap to construct and fast enough to sample
/// several values per particle per frame.
#[derive(Debug)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a sampler with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform f32 in `[min, max)`.
    ///
    /// A degenerate range (`min >= max`) yields `min` rather than panicking;
    /// range ordering is the caller's contract, not validated here.
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform point in a `width x height` rectangle centered on the origin,
    /// on the z = 0 plane.
    pub fn point_in_rect(&mut self, width: f32, height: f32) -> Vec3 {
        Vec3::new(
            self.range(-width / 2.0, width / 2.0),
            self.range(-height / 2.0, height / 2.0),
            0.0,
        )
    }

    /// Uniform point in `[-radius, radius]^2` on the z = 0 plane.
    pub fn point_in_square(&mut self, radius: f32) -> Vec3 {
        Vec3::new(
            self.range(-radius, radius),
            self.range(-radius, radius),
            0.0,
        )
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}
