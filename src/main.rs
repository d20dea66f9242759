use std::f32::consts::TAU;

use glyphdust::prelude::*;
use glyphdust::RunError;

/// A stand-in for a loaded logo mesh: a dense "0" glyph with a diagonal
/// slash, on the z = 0 plane.
fn demo_shape() -> Vec<Vec3> {
    let mut points = Vec::new();

    // Ring outline, a few jittered rows deep.
    for row in 0..6 {
        let radius = 12.0 + row as f32 * 0.6;
        let count = 220 + row * 20;
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            points.push(Vec3::new(
                radius * angle.cos() * 0.8,
                radius * angle.sin(),
                0.0,
            ));
        }
    }

    // Slash from bottom-left to top-right.
    for i in 0..260 {
        let t = i as f32 / 260.0;
        let spread = (i % 5) as f32 * 0.3 - 0.6;
        points.push(Vec3::new(
            (t * 2.0 - 1.0) * 11.0 + spread,
            (t * 2.0 - 1.0) * 15.0,
            0.0,
        ));
    }

    points
}

fn main() -> Result<(), RunError> {
    let mut engine = Engine::new(SimulationConfig::default(), 1280.0, 720.0);
    engine.load_shape(demo_shape());
    glyphdust::app::run(engine)
}
