//! Frame counting and FPS tracking.
//!
//! Simulation time is measured in frames, not seconds: the motion model has
//! no delta-time term, so frame cost variance directly changes the wander
//! rate. Wall-clock time only appears here, to refresh the FPS readout in
//! the window title.

use std::time::{Duration, Instant};

/// Tracks frames rendered and a periodically refreshed FPS value.
#[derive(Debug)]
pub struct FrameTimer {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Count a frame. Returns `Some(fps)` when the readout was refreshed.
    pub fn update(&mut self) -> Option<f32> {
        self.frame_count += 1;

        let now = Instant::now();
        let elapsed = now.duration_since(self.fps_update_time);
        if elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return Some(self.fps);
        }
        None
    }

    /// Total frames counted.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last computed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
