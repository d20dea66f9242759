//! Simulation tunables.
//!
//! All ranges are sampled uniformly with [`crate::Sampler`]. Every `min_*`
//! field is assumed to be `<=` its paired `max_*`; that invariant is a caller
//! precondition and is not validated here. A violated pair degrades to the
//! `min` value (see [`crate::Sampler::range`]) rather than panicking.

/// Tunable parameters for both particle populations.
///
/// Mutated between frames only through [`crate::Command`]s, never inside a
/// frame step.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Camera distance from the z = 0 particle plane. Default 50.
    pub camera_height: f32,
    /// World-space radius of the pointer repulsion field. Default 10.
    pub repulsion_radius: f32,

    // Anchored population
    /// Minimum sprite size. Default 1.
    pub min_particle_size: f32,
    /// Maximum sprite size. Default 6.
    pub max_particle_size: f32,
    /// Minimum sprite alpha. Default 0.2.
    pub min_particle_alpha: f32,
    /// Maximum sprite alpha. Default 1.
    pub max_particle_alpha: f32,
    /// Minimum frames between wander resamples. Default 10.
    pub min_frame: f32,
    /// Maximum frames between wander resamples. Default 30.
    pub max_frame: f32,
    /// Minimum wander speed factor. Default 0.03.
    pub min_brown_speed: f32,
    /// Maximum wander speed factor. Default 0.08.
    pub max_brown_speed: f32,
    /// Minimum radial wander offset. Default 0.
    pub min_brown_radius: f32,
    /// Maximum radial wander offset. Default 1.
    pub max_brown_radius: f32,

    // Free population
    /// Number of free particles. Default 300.
    pub free_count: usize,
    /// Minimum free sprite size. Default 0.5.
    pub min_free_size: f32,
    /// Maximum free sprite size. Default 3.
    pub max_free_size: f32,
    /// Minimum free sprite alpha. Default 0.1.
    pub min_free_alpha: f32,
    /// Maximum free sprite alpha. Default 0.6.
    pub max_free_alpha: f32,
    /// Minimum frames between free wander resamples. Default 40.
    pub min_free_frame: f32,
    /// Maximum frames between free wander resamples. Default 120.
    pub max_free_frame: f32,
    /// Minimum free wander speed factor. Default 0.005.
    pub min_free_speed: f32,
    /// Maximum free wander speed factor. Default 0.02.
    pub max_free_speed: f32,
    /// Half-size of the square used by [`crate::Command::ResetFree`].
    /// Default 60.
    pub free_spawn_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            camera_height: 50.0,
            repulsion_radius: 10.0,

            min_particle_size: 1.0,
            max_particle_size: 6.0,
            min_particle_alpha: 0.2,
            max_particle_alpha: 1.0,
            min_frame: 10.0,
            max_frame: 30.0,
            min_brown_speed: 0.03,
            max_brown_speed: 0.08,
            min_brown_radius: 0.0,
            max_brown_radius: 1.0,

            free_count: 300,
            min_free_size: 0.5,
            max_free_size: 3.0,
            min_free_alpha: 0.1,
            max_free_alpha: 0.6,
            min_free_frame: 40.0,
            max_free_frame: 120.0,
            min_free_speed: 0.005,
            max_free_speed: 0.02,
            free_spawn_radius: 60.0,
        }
    }
}
