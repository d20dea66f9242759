//! Particle state stores for the two populations.
//!
//! Both populations keep attribute-parallel arrays: world-space positions
//! (authoritative, mutated by the motion step), the active wander vector,
//! and the resample interval per particle, plus the flat GPU staging
//! attributes in [`VertexAttributes`]. Counts are fixed at creation; the
//! free population is replaced wholesale when its count changes.

use glam::Vec3;

use crate::buffers::VertexAttributes;
use crate::config::SimulationConfig;
use crate::rng::Sampler;
use crate::viewport::Extents;

/// Which population a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationKind {
    Anchored,
    Free,
}

fn fill_attribute(data: &mut [f32], min: f32, max: f32, sampler: &mut Sampler) {
    for v in data {
        *v = sampler.range(min, max);
    }
}

/// Particles pinned to the silhouette of a loaded shape.
///
/// Each particle has a fixed `origin`; the wander resample biases the drift
/// back toward it, which is the only homing force in the model.
#[derive(Debug)]
pub struct AnchoredPopulation {
    origins: Vec<Vec3>,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) wander: Vec<Vec3>,
    pub(crate) intervals: Vec<u32>,
    pub(crate) attributes: VertexAttributes,
}

impl AnchoredPopulation {
    /// Build the population from the shape's vertex cloud.
    ///
    /// Positions start at their origins; sizes and alphas are sampled from
    /// the configured ranges; every interval starts at 1 so the first
    /// simulated frame resamples the wander vector.
    pub fn new(origins: Vec<Vec3>, cfg: &SimulationConfig, sampler: &mut Sampler) -> Self {
        let count = origins.len();
        let mut attributes = VertexAttributes::with_count(count);
        attributes.positions.sync_positions(&origins);
        fill_attribute(
            attributes.sizes.as_mut_slice(),
            cfg.min_particle_size,
            cfg.max_particle_size,
            sampler,
        );
        fill_attribute(
            attributes.alphas.as_mut_slice(),
            cfg.min_particle_alpha,
            cfg.max_particle_alpha,
            sampler,
        );

        Self {
            positions: origins.clone(),
            origins,
            wander: vec![Vec3::ZERO; count],
            intervals: vec![1; count],
            attributes,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    #[inline]
    pub fn origins(&self) -> &[Vec3] {
        &self.origins
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn wander(&self) -> &[Vec3] {
        &self.wander
    }

    #[inline]
    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    /// Mutable staging access for the rendering layer (dirty-flag intake).
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut VertexAttributes {
        &mut self.attributes
    }

    /// Scatter every particle to a fresh uniform sample in
    /// `[-radius, radius]^2` on the z = 0 plane.
    ///
    /// Origins, sizes, alphas and timers are untouched; the wander model
    /// pulls the cloud back toward the shape over the following frames.
    pub fn reset_positions(&mut self, radius: f32, sampler: &mut Sampler) {
        for p in &mut self.positions {
            *p = sampler.point_in_square(radius);
        }
    }

    /// Rewrite the whole size attribute from a new range and mark it dirty.
    pub fn resample_sizes(&mut self, min: f32, max: f32, sampler: &mut Sampler) {
        fill_attribute(self.attributes.sizes.as_mut_slice(), min, max, sampler);
    }

    /// Rewrite the whole alpha attribute from a new range and mark it dirty.
    pub fn resample_alphas(&mut self, min: f32, max: f32, sampler: &mut Sampler) {
        fill_attribute(self.attributes.alphas.as_mut_slice(), min, max, sampler);
    }

    /// Copy current positions into the staging buffer and mark it dirty.
    pub fn sync_buffers(&mut self) {
        self.attributes.positions.sync_positions(&self.positions);
    }
}

/// Particles with no anchor, wandering the visible viewport.
#[derive(Debug)]
pub struct FreePopulation {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) wander: Vec<Vec3>,
    pub(crate) intervals: Vec<u32>,
    pub(crate) attributes: VertexAttributes,
}

impl FreePopulation {
    /// Spawn `count` particles uniformly inside the visible extents.
    pub fn new(
        count: usize,
        extents: Extents,
        cfg: &SimulationConfig,
        sampler: &mut Sampler,
    ) -> Self {
        let positions: Vec<Vec3> = (0..count)
            .map(|_| sampler.point_in_rect(extents.width, extents.height))
            .collect();

        let mut attributes = VertexAttributes::with_count(count);
        attributes.positions.sync_positions(&positions);
        fill_attribute(
            attributes.sizes.as_mut_slice(),
            cfg.min_free_size,
            cfg.max_free_size,
            sampler,
        );
        fill_attribute(
            attributes.alphas.as_mut_slice(),
            cfg.min_free_alpha,
            cfg.max_free_alpha,
            sampler,
        );

        Self {
            positions,
            wander: vec![Vec3::ZERO; count],
            intervals: vec![1; count],
            attributes,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn wander(&self) -> &[Vec3] {
        &self.wander
    }

    #[inline]
    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    /// Mutable staging access for the rendering layer (dirty-flag intake).
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut VertexAttributes {
        &mut self.attributes
    }

    /// Scatter every particle to a fresh uniform sample in
    /// `[-radius, radius]^2`, the free analog of
    /// [`AnchoredPopulation::reset_positions`].
    pub fn reset_positions(&mut self, radius: f32, sampler: &mut Sampler) {
        for p in &mut self.positions {
            *p = sampler.point_in_square(radius);
        }
    }

    /// Rewrite the whole size attribute from a new range and mark it dirty.
    pub fn resample_sizes(&mut self, min: f32, max: f32, sampler: &mut Sampler) {
        fill_attribute(self.attributes.sizes.as_mut_slice(), min, max, sampler);
    }

    /// Rewrite the whole alpha attribute from a new range and mark it dirty.
    pub fn resample_alphas(&mut self, min: f32, max: f32, sampler: &mut Sampler) {
        fill_attribute(self.attributes.alphas.as_mut_slice(), min, max, sampler);
    }

    /// Copy current positions into the staging buffer and mark it dirty.
    pub fn sync_buffers(&mut self) {
        self.attributes.positions.sync_positions(&self.positions);
    }
}
