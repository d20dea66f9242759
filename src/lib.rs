//! # glyphdust - anchored point-cloud logo animation
//!
//! An interactive particle animation in the spirit of point-cloud logo
//! intros: one population of particles is anchored to the silhouette of a
//! loaded shape and jitters around it with a Brownian-style wander model,
//! while a second, free population drifts across the visible viewport.
//! Moving the pointer repels the anchored particles; they wander back home
//! over the following frames.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glyphdust::prelude::*;
//!
//! fn main() -> Result<(), glyphdust::RunError> {
//!     let mut engine = Engine::new(SimulationConfig::default(), 1280.0, 720.0);
//!     engine.load_shape(my_logo_points());
//!     glyphdust::app::run(engine)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Populations
//!
//! - **Anchored**: one particle per shape vertex, pinned to a fixed origin.
//!   The wander resample biases each particle's drift back toward its
//!   origin, which is the only homing force in the model.
//! - **Free**: a fixed-count cloud wandering toward random targets inside
//!   the visible world extents.
//!
//! ### Frame-based time
//!
//! The motion model has no delta-time term: a particle keeps its current
//! wander vector for a per-particle number of *frames*, then resamples it.
//! The animation loop simply runs one step per display refresh.
//!
//! ### Commands
//!
//! All external inputs (pointer moves, resizes, config tweaks) are queued as
//! [`Command`]s and drained at the top of the next step, so particle state
//! has exactly one writer:
//!
//! ```ignore
//! engine.queue(Command::SetRepulsionRadius(15.0));
//! engine.queue(Command::ResetAnchored { radius: 1000.0 });
//! ```
//!
//! ### Buffer synchronization
//!
//! After each step the engine mirrors positions into flat staging arrays
//! ([`buffers::AttributeBuffer`]) and marks them dirty; the GPU layer
//! uploads exactly the dirty arrays. Size/alpha staging is only rewritten
//! (and re-uploaded) when a range-change command re-samples it.

pub mod app;
pub mod buffers;
mod config;
mod engine;
pub mod error;
pub mod gpu;
pub mod motion;
mod population;
mod rng;
pub mod shader;
pub mod time;
mod viewport;

pub use bytemuck;
pub use config::SimulationConfig;
pub use engine::{Command, Engine};
pub use error::{GpuError, RunError};
pub use glam::{Vec2, Vec3};
pub use population::{AnchoredPopulation, FreePopulation, PopulationKind};
pub use rng::Sampler;
pub use viewport::{Extents, Viewport, FOV_DEGREES};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glyphdust::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{run, App};
    pub use crate::config::SimulationConfig;
    pub use crate::engine::{Command, Engine};
    pub use crate::population::{AnchoredPopulation, FreePopulation, PopulationKind};
    pub use crate::rng::Sampler;
    pub use crate::time::FrameTimer;
    pub use crate::viewport::{Extents, Viewport};
    pub use crate::{Vec2, Vec3};
}
