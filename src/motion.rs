//! Per-frame motion model.
//!
//! One step advances the global frame counter and then, for every particle:
//! pointer repulsion (anchored only), wander resampling when the particle's
//! interval divides the frame counter, and the unconditional drift
//! `position += wander`. Positions change by exactly those two terms; there
//! is no other integration.

use std::f32::consts::PI;

use glam::Vec3;

use crate::config::SimulationConfig;
use crate::population::{AnchoredPopulation, FreePopulation};
use crate::rng::Sampler;
use crate::viewport::Extents;

/// Wrap bound for the global frame counter. Resample intervals are tens of
/// frames, far below this, so the wrap never skews a particle's schedule.
pub const FRAME_WRAP: u32 = 10_000;

/// Minimum pointer distance used for the repulsion falloff. The inverse
/// square is singular at zero distance; anything closer pushes as if it were
/// this far away.
pub const MIN_REPULSION_DISTANCE: f32 = 1e-4;

/// Advance the global frame counter by one, wrapping at [`FRAME_WRAP`].
#[inline]
pub fn advance_frame(frame: u32) -> u32 {
    (frame + 1) % FRAME_WRAP
}

/// Apply inverse-square pointer repulsion to `position`.
///
/// Active iff `dist(mouse, position) < radius`, strictly: a particle exactly
/// on the boundary is not pushed. The displacement is `-to_mouse / dist^2`,
/// so the push away from the pointer grows as it closes in.
pub fn repel(position: &mut Vec3, mouse: Vec3, radius: f32) {
    let to_mouse = mouse - *position;
    let dist = to_mouse.length();
    if dist < radius {
        let dist = dist.max(MIN_REPULSION_DISTANCE);
        *position -= to_mouse / (dist * dist);
    }
}

/// Sample a fresh wander vector for an anchored particle.
///
/// A radial offset of random length (brown-radius range) is rotated by a
/// uniform angle in `[0, pi]` about the z axis and added to the vector back
/// to the origin; the sum is scaled by a random speed. The origin term is
/// what (probabilistically) pulls displaced particles home.
pub fn anchored_wander(
    origin: Vec3,
    position: Vec3,
    cfg: &SimulationConfig,
    sampler: &mut Sampler,
) -> Vec3 {
    let brown_radius = sampler.range(cfg.min_brown_radius, cfg.max_brown_radius);
    let angle = sampler.range(0.0, PI);
    let radial = Vec3::new(brown_radius * angle.cos(), brown_radius * angle.sin(), 0.0);
    let speed = sampler.range(cfg.min_brown_speed, cfg.max_brown_speed);
    ((origin - position) + radial) * speed
}

/// Sample a fresh wander vector for a free particle: a step toward a random
/// target inside the visible extents.
pub fn free_wander(
    position: Vec3,
    extents: Extents,
    cfg: &SimulationConfig,
    sampler: &mut Sampler,
) -> Vec3 {
    let target = sampler.point_in_rect(extents.width, extents.height);
    let speed = sampler.range(cfg.min_free_speed, cfg.max_free_speed);
    (target - position) * speed
}

/// Sample a resample interval from `[min, max)`, floored to at least 1 frame.
/// A zero interval would make the modulo schedule divide by zero.
#[inline]
pub fn sample_interval(min: f32, max: f32, sampler: &mut Sampler) -> u32 {
    (sampler.range(min, max).floor() as u32).max(1)
}

/// Advance the anchored population by one frame.
pub fn step_anchored(
    pop: &mut AnchoredPopulation,
    frame: u32,
    mouse: Vec3,
    cfg: &SimulationConfig,
    sampler: &mut Sampler,
) {
    for i in 0..pop.positions.len() {
        repel(&mut pop.positions[i], mouse, cfg.repulsion_radius);

        if frame % pop.intervals[i] == 0 {
            let origin = pop.origins()[i];
            let position = pop.positions[i];
            pop.wander[i] = anchored_wander(origin, position, cfg, sampler);
            pop.intervals[i] = sample_interval(cfg.min_frame, cfg.max_frame, sampler);
        }

        let wander = pop.wander[i];
        pop.positions[i] += wander;
    }
}

/// Advance the free population by one frame.
pub fn step_free(
    pop: &mut FreePopulation,
    frame: u32,
    extents: Extents,
    cfg: &SimulationConfig,
    sampler: &mut Sampler,
) {
    for i in 0..pop.positions.len() {
        if frame % pop.intervals[i] == 0 {
            pop.wander[i] = free_wander(pop.positions[i], extents, cfg, sampler);
            pop.intervals[i] = sample_interval(cfg.min_free_frame, cfg.max_free_frame, sampler);
        }

        let wander = pop.wander[i];
        pop.positions[i] += wander;
    }
}
