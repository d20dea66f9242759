//! Integration tests driving the engine through whole frame steps.
//!
//! Everything runs on a seeded [`Sampler`] so the assertions are exact.

use glyphdust::prelude::*;
use glyphdust::motion;

fn seeded_engine(cfg: SimulationConfig, seed: u64) -> Engine {
    Engine::with_sampler(cfg, 800.0, 600.0, Sampler::from_seed(seed))
}

fn line_shape(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| Vec3::new(i as f32 * 0.5 - 10.0, (i % 7) as f32, 0.0))
        .collect()
}

// ============================================================================
// Spawn-time attribute ranges
// ============================================================================

#[test]
fn test_spawned_attributes_within_ranges() {
    let cfg = SimulationConfig::default();
    let mut engine = seeded_engine(cfg.clone(), 1);
    engine.load_shape(line_shape(100));

    let anchored = engine.anchored().unwrap();
    for &size in anchored.attributes().sizes.as_slice() {
        assert!(size >= cfg.min_particle_size && size <= cfg.max_particle_size);
    }
    for &alpha in anchored.attributes().alphas.as_slice() {
        assert!(alpha >= cfg.min_particle_alpha && alpha <= cfg.max_particle_alpha);
    }

    let free = engine.free();
    for &size in free.attributes().sizes.as_slice() {
        assert!(size >= cfg.min_free_size && size <= cfg.max_free_size);
    }
    for &alpha in free.attributes().alphas.as_slice() {
        assert!(alpha >= cfg.min_free_alpha && alpha <= cfg.max_free_alpha);
    }
}

// ============================================================================
// Exact step arithmetic
// ============================================================================

#[test]
fn test_step_adds_exactly_the_wander_vector() {
    // Pointer starts far offscreen, so the only position delta is the
    // wander vector resampled on the first frame (interval starts at 1).
    let mut engine = seeded_engine(SimulationConfig::default(), 2);
    engine.load_shape(line_shape(50));

    let origins = engine.anchored().unwrap().origins().to_vec();
    engine.step();

    let anchored = engine.anchored().unwrap();
    for i in 0..50 {
        assert_eq!(anchored.positions()[i], origins[i] + anchored.wander()[i]);
    }
}

#[test]
fn test_step_applies_repulsion_term_exactly() {
    // Zero wander speed isolates the repulsion displacement.
    let cfg = SimulationConfig {
        min_brown_speed: 0.0,
        max_brown_speed: 0.0,
        ..Default::default()
    };
    let mut engine = seeded_engine(cfg, 3);
    engine.load_shape(vec![Vec3::new(2.0, 0.0, 0.0)]);

    // Pointer at display center maps to the world origin, 2 units from the
    // particle, well inside the default radius of 10.
    engine.queue(Command::PointerMoved { x: 400.0, y: 300.0 });
    engine.step();

    // to_mouse = (-2, 0, 0), dist = 2, displacement = -to_mouse / 4.
    let p = engine.anchored().unwrap().positions()[0];
    assert!((p - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_no_repulsion_at_exact_radius() {
    let mut p = Vec3::ZERO;
    motion::repel(&mut p, Vec3::new(10.0, 0.0, 0.0), 10.0);
    assert_eq!(p, Vec3::ZERO);

    // Just inside the boundary it does apply.
    let mut q = Vec3::ZERO;
    motion::repel(&mut q, Vec3::new(9.999, 0.0, 0.0), 10.0);
    assert_ne!(q, Vec3::ZERO);
}

// ============================================================================
// Resample scheduling
// ============================================================================

#[test]
fn test_wander_resamples_only_on_schedule() {
    // Degenerate frame range pins every resampled interval to 4.
    let cfg = SimulationConfig {
        min_frame: 4.0,
        max_frame: 4.0,
        ..Default::default()
    };
    let mut engine = seeded_engine(cfg, 4);
    engine.load_shape(vec![Vec3::new(1.0, 2.0, 0.0)]);

    // Frame 1: the spawn interval of 1 forces a resample.
    engine.step();
    let w1 = engine.anchored().unwrap().wander()[0];
    assert_ne!(w1, Vec3::ZERO);

    // Frames 2 and 3: 2 % 4 != 0 and 3 % 4 != 0, wander held constant.
    engine.step();
    assert_eq!(engine.anchored().unwrap().wander()[0], w1);
    engine.step();
    assert_eq!(engine.anchored().unwrap().wander()[0], w1);

    // Frame 4: 4 % 4 == 0, a fresh vector.
    engine.step();
    let w4 = engine.anchored().unwrap().wander()[0];
    assert_ne!(w4, w1);

    // Frames 5..7 hold again.
    for _ in 0..3 {
        engine.step();
        assert_eq!(engine.anchored().unwrap().wander()[0], w4);
    }
}

// ============================================================================
// Resize, spawn domains and population lifecycle
// ============================================================================

#[test]
fn test_resize_then_respawn_bounds_free_particles() {
    let mut engine = seeded_engine(SimulationConfig::default(), 5);
    engine.queue(Command::Resized {
        width: 1600,
        height: 900,
    });
    engine.queue(Command::ResizeFree { count: 400 });
    engine.step();

    let extents = engine.viewport().world_extents();
    // 2 * tan(37.5 deg) * 50, then width from the 16:9 aspect.
    assert!((extents.height - 76.7327).abs() < 1e-3);
    assert!((extents.width - 136.4137).abs() < 1e-3);

    // Spawn positions lie inside the extents, and the first drift step is a
    // lerp toward an in-rect target, so the bound still holds after it.
    assert_eq!(engine.free().len(), 400);
    for p in engine.free().positions() {
        assert!(p.x.abs() <= extents.width / 2.0);
        assert!(p.y.abs() <= extents.height / 2.0);
    }
}

#[test]
fn test_reset_anchored_scatters_only_positions() {
    let mut engine = seeded_engine(SimulationConfig::default(), 6);
    engine.load_shape(line_shape(64));

    let origins = engine.anchored().unwrap().origins().to_vec();
    let sizes = engine
        .anchored()
        .unwrap()
        .attributes()
        .sizes
        .as_slice()
        .to_vec();

    engine.queue(Command::ResetAnchored { radius: 1000.0 });
    engine.step();

    let anchored = engine.anchored().unwrap();
    assert_eq!(anchored.origins(), origins.as_slice());
    assert_eq!(anchored.attributes().sizes.as_slice(), sizes.as_slice());
    for (p, w) in anchored.positions().iter().zip(anchored.wander()) {
        // The step after the reset adds one wander vector; subtracting it
        // back recovers the scattered sample.
        let scattered = *p - *w;
        assert!(scattered.x.abs() <= 1000.0);
        assert!(scattered.y.abs() <= 1000.0);
        assert_eq!(scattered.z, 0.0);
    }
}

#[test]
fn test_free_resize_discards_old_state() {
    let mut engine = seeded_engine(SimulationConfig::default(), 7);
    for _ in 0..10 {
        engine.step();
    }
    let old_positions = engine.free().positions().to_vec();

    engine.queue(Command::ResizeFree { count: 120 });
    engine.step();

    assert_eq!(engine.free().len(), 120);
    assert_eq!(engine.free().attributes().alphas.len(), 120);
    // Fresh samples, not a truncation of the old array.
    let carried = engine
        .free()
        .positions()
        .iter()
        .filter(|p| old_positions.contains(p))
        .count();
    assert_eq!(carried, 0);
}

// ============================================================================
// Buffer synchronization contract
// ============================================================================

#[test]
fn test_position_staging_dirty_after_step() {
    let mut engine = seeded_engine(SimulationConfig::default(), 8);
    engine.load_shape(line_shape(16));

    // Drain the spawn-time dirty flags first.
    engine.anchored_mut().unwrap().attributes_mut().positions.take_dirty();
    engine.anchored_mut().unwrap().attributes_mut().sizes.take_dirty();

    engine.step();

    let attrs = engine.anchored_mut().unwrap().attributes_mut();
    assert!(attrs.positions.take_dirty());
    // Sizes were not touched by the step.
    assert!(!attrs.sizes.take_dirty());
}

#[test]
fn test_staging_mirrors_positions_after_step() {
    let mut engine = seeded_engine(SimulationConfig::default(), 9);
    engine.load_shape(line_shape(8));
    engine.step();

    let anchored = engine.anchored().unwrap();
    let flat = anchored.attributes().positions.as_slice();
    for (i, p) in anchored.positions().iter().enumerate() {
        assert_eq!(&flat[i * 3..i * 3 + 3], &[p.x, p.y, p.z]);
    }
}

#[test]
fn test_alpha_range_command_marks_attribute_dirty() {
    let mut engine = seeded_engine(SimulationConfig::default(), 10);
    engine.load_shape(line_shape(16));
    engine.anchored_mut().unwrap().attributes_mut().alphas.take_dirty();

    engine.queue(Command::SetAlphaRange {
        population: PopulationKind::Anchored,
        min: 0.4,
        max: 0.5,
    });
    engine.step();

    let attrs = engine.anchored_mut().unwrap().attributes_mut();
    assert!(attrs.alphas.take_dirty());
    for &alpha in attrs.alphas.as_slice() {
        assert!((0.4..0.5).contains(&alpha));
    }
}

// ============================================================================
// Shader source sanity
// ============================================================================

#[test]
fn test_render_shader_parses() {
    naga::front::wgsl::parse_str(glyphdust::shader::SHADER_SOURCE)
        .expect("render shader should be valid WGSL");
}
