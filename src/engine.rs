//! Engine: simulation state owner and command intake.
//!
//! The engine owns everything a frame step reads or writes: the config, the
//! viewport mapping, the frame counter, the cached world-space pointer
//! position and both populations. External inputs (pointer moves, resizes,
//! UI tweaks) arrive as [`Command`]s and are drained at the top of each
//! step, so particle state only ever has a single writer.

use glam::Vec3;

use crate::config::SimulationConfig;
use crate::motion;
use crate::population::{AnchoredPopulation, FreePopulation, PopulationKind};
use crate::rng::Sampler;
use crate::viewport::Viewport;

/// Initial cached pointer position: far outside any plausible repulsion
/// radius, so nothing is pushed before the first real pointer event.
const MOUSE_OFFSCREEN: Vec3 = Vec3::new(-1000.0, -1000.0, 0.0);

/// An external input, applied between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pointer moved, in display pixels (origin top-left).
    PointerMoved { x: f32, y: f32 },
    /// Display size changed.
    Resized { width: u32, height: u32 },
    /// Camera distance changed; recomputes the visible extents.
    SetCameraHeight(f32),
    SetRepulsionRadius(f32),
    /// New size range; re-samples the population's size attribute in place.
    SetSizeRange {
        population: PopulationKind,
        min: f32,
        max: f32,
    },
    /// New alpha range; re-samples the population's alpha attribute in place.
    SetAlphaRange {
        population: PopulationKind,
        min: f32,
        max: f32,
    },
    /// New resample-interval range; takes effect at each particle's next
    /// resample.
    SetFrameRange {
        population: PopulationKind,
        min: f32,
        max: f32,
    },
    /// New wander-speed range; takes effect at each particle's next resample.
    SetSpeedRange {
        population: PopulationKind,
        min: f32,
        max: f32,
    },
    /// New radial-offset range for the anchored wander model.
    SetBrownRadiusRange { min: f32, max: f32 },
    /// Scatter the anchored population inside `[-radius, radius]^2`.
    ResetAnchored { radius: f32 },
    /// Scatter the free population inside the configured spawn square.
    ResetFree,
    /// Tear down and respawn the free population at a new count.
    ResizeFree { count: usize },
}

/// The simulation core: state store, motion driver and buffer sync.
#[derive(Debug)]
pub struct Engine {
    cfg: SimulationConfig,
    sampler: Sampler,
    viewport: Viewport,
    frame: u32,
    mouse: Vec3,
    anchored: Option<AnchoredPopulation>,
    free: FreePopulation,
    pending: Vec<Command>,
}

impl Engine {
    /// Create an engine with an entropy-seeded sampler.
    ///
    /// The free population spawns eagerly; the anchored one appears when
    /// [`Engine::load_shape`] delivers the shape's vertex cloud.
    pub fn new(cfg: SimulationConfig, display_width: f32, display_height: f32) -> Self {
        Self::with_sampler(cfg, display_width, display_height, Sampler::new())
    }

    /// Create an engine with a caller-provided sampler (seed it for a
    /// reproducible run).
    pub fn with_sampler(
        cfg: SimulationConfig,
        display_width: f32,
        display_height: f32,
        mut sampler: Sampler,
    ) -> Self {
        let viewport = Viewport::new(display_width, display_height, cfg.camera_height);
        let free = FreePopulation::new(
            cfg.free_count,
            viewport.world_extents(),
            &cfg,
            &mut sampler,
        );

        Self {
            cfg,
            sampler,
            viewport,
            frame: 0,
            mouse: MOUSE_OFFSCREEN,
            anchored: None,
            free,
            pending: Vec::new(),
        }
    }

    /// Supply the anchor shape's vertex cloud, creating the anchored
    /// population. Called once when the shape finishes loading.
    pub fn load_shape(&mut self, origins: Vec<Vec3>) {
        self.anchored = Some(AnchoredPopulation::new(
            origins,
            &self.cfg,
            &mut self.sampler,
        ));
    }

    /// Queue a command for the next step. Last-write-wins semantics fall out
    /// of FIFO application (a later `PointerMoved` overwrites an earlier
    /// one's effect).
    pub fn queue(&mut self, cmd: Command) {
        self.pending.push(cmd);
    }

    /// Advance the simulation by one frame: drain queued commands, bump the
    /// frame counter, run the motion model for both populations, then sync
    /// the position staging buffers.
    pub fn step(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for cmd in pending {
            self.apply(cmd);
        }

        self.frame = motion::advance_frame(self.frame);

        if let Some(anchored) = &mut self.anchored {
            motion::step_anchored(anchored, self.frame, self.mouse, &self.cfg, &mut self.sampler);
            anchored.sync_buffers();
        }

        let extents = self.viewport.world_extents();
        motion::step_free(&mut self.free, self.frame, extents, &self.cfg, &mut self.sampler);
        self.free.sync_buffers();
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::PointerMoved { x, y } => {
                self.mouse = self.viewport.pointer_to_world(x, y);
            }
            Command::Resized { width, height } => {
                self.viewport.resize(width as f32, height as f32);
            }
            Command::SetCameraHeight(height) => {
                self.cfg.camera_height = height;
                self.viewport.set_camera_distance(height);
            }
            Command::SetRepulsionRadius(radius) => {
                self.cfg.repulsion_radius = radius;
            }
            Command::SetSizeRange {
                population,
                min,
                max,
            } => match population {
                PopulationKind::Anchored => {
                    self.cfg.min_particle_size = min;
                    self.cfg.max_particle_size = max;
                    if let Some(anchored) = &mut self.anchored {
                        anchored.resample_sizes(min, max, &mut self.sampler);
                    }
                }
                PopulationKind::Free => {
                    self.cfg.min_free_size = min;
                    self.cfg.max_free_size = max;
                    self.free.resample_sizes(min, max, &mut self.sampler);
                }
            },
            Command::SetAlphaRange {
                population,
                min,
                max,
            } => match population {
                PopulationKind::Anchored => {
                    self.cfg.min_particle_alpha = min;
                    self.cfg.max_particle_alpha = max;
                    if let Some(anchored) = &mut self.anchored {
                        anchored.resample_alphas(min, max, &mut self.sampler);
                    }
                }
                PopulationKind::Free => {
                    self.cfg.min_free_alpha = min;
                    self.cfg.max_free_alpha = max;
                    self.free.resample_alphas(min, max, &mut self.sampler);
                }
            },
            Command::SetFrameRange {
                population,
                min,
                max,
            } => match population {
                PopulationKind::Anchored => {
                    self.cfg.min_frame = min;
                    self.cfg.max_frame = max;
                }
                PopulationKind::Free => {
                    self.cfg.min_free_frame = min;
                    self.cfg.max_free_frame = max;
                }
            },
            Command::SetSpeedRange {
                population,
                min,
                max,
            } => match population {
                PopulationKind::Anchored => {
                    self.cfg.min_brown_speed = min;
                    self.cfg.max_brown_speed = max;
                }
                PopulationKind::Free => {
                    self.cfg.min_free_speed = min;
                    self.cfg.max_free_speed = max;
                }
            },
            Command::SetBrownRadiusRange { min, max } => {
                self.cfg.min_brown_radius = min;
                self.cfg.max_brown_radius = max;
            }
            Command::ResetAnchored { radius } => {
                if let Some(anchored) = &mut self.anchored {
                    anchored.reset_positions(radius, &mut self.sampler);
                }
            }
            Command::ResetFree => {
                let radius = self.cfg.free_spawn_radius;
                self.free.reset_positions(radius, &mut self.sampler);
            }
            Command::ResizeFree { count } => {
                self.cfg.free_count = count;
                self.free = FreePopulation::new(
                    count,
                    self.viewport.world_extents(),
                    &self.cfg,
                    &mut self.sampler,
                );
            }
        }
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.cfg
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Cached world-space pointer position read by the next step.
    #[inline]
    pub fn mouse(&self) -> Vec3 {
        self.mouse
    }

    #[inline]
    pub fn anchored(&self) -> Option<&AnchoredPopulation> {
        self.anchored.as_ref()
    }

    #[inline]
    pub fn free(&self) -> &FreePopulation {
        &self.free
    }

    /// Mutable population access for the rendering layer, which consumes
    /// the staging buffers and their dirty flags.
    #[inline]
    pub fn anchored_mut(&mut self) -> Option<&mut AnchoredPopulation> {
        self.anchored.as_mut()
    }

    #[inline]
    pub fn free_mut(&mut self) -> &mut FreePopulation {
        &mut self.free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::PopulationKind;

    fn engine() -> Engine {
        Engine::with_sampler(
            SimulationConfig::default(),
            800.0,
            600.0,
            Sampler::from_seed(17),
        )
    }

    #[test]
    fn test_commands_drain_before_motion() {
        let mut engine = engine();
        engine.queue(Command::SetRepulsionRadius(42.0));
        assert_eq!(engine.config().repulsion_radius, 10.0);
        engine.step();
        assert_eq!(engine.config().repulsion_radius, 42.0);
        assert!(engine.pending.is_empty());
    }

    #[test]
    fn test_pointer_command_maps_to_world() {
        let mut engine = engine();
        engine.queue(Command::PointerMoved { x: 400.0, y: 300.0 });
        engine.step();
        assert!(engine.mouse().x.abs() < 1e-4);
        assert!(engine.mouse().y.abs() < 1e-4);
    }

    #[test]
    fn test_pointer_starts_offscreen() {
        let engine = engine();
        assert_eq!(engine.mouse(), Vec3::new(-1000.0, -1000.0, 0.0));
    }

    #[test]
    fn test_resize_then_pointer_uses_new_extents() {
        let mut engine = engine();
        // Same queue, FIFO: the resize lands before the pointer mapping.
        engine.queue(Command::Resized {
            width: 1600,
            height: 900,
        });
        engine.queue(Command::PointerMoved { x: 1600.0, y: 450.0 });
        engine.step();
        let extents = engine.viewport().world_extents();
        assert!((engine.mouse().x - extents.width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_camera_height_recomputes_extents() {
        let mut engine = engine();
        let before = engine.viewport().world_extents();
        engine.queue(Command::SetCameraHeight(100.0));
        engine.step();
        let after = engine.viewport().world_extents();
        assert!((after.height - before.height * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_free_replaces_population() {
        let mut engine = engine();
        assert_eq!(engine.free().len(), 300);
        engine.queue(Command::ResizeFree { count: 50 });
        engine.step();
        assert_eq!(engine.free().len(), 50);
        assert_eq!(engine.config().free_count, 50);
        assert_eq!(engine.free().attributes().sizes.len(), 50);
    }

    #[test]
    fn test_alpha_range_resamples_free_attribute() {
        let mut engine = engine();
        engine.queue(Command::SetAlphaRange {
            population: PopulationKind::Free,
            min: 0.8,
            max: 0.9,
        });
        engine.step();
        for &alpha in engine.free().attributes().alphas.as_slice() {
            assert!((0.8..0.9).contains(&alpha));
        }
    }

    #[test]
    fn test_step_without_shape_only_moves_free() {
        let mut engine = engine();
        assert!(engine.anchored().is_none());
        engine.step();
        assert_eq!(engine.frame(), 1);
    }
}
