//! Display-to-world projection mapping.
//!
//! The particle plane lives at z = 0 and is viewed by a fixed perspective
//! camera on the z axis. The visible world-space rectangle at that plane is
//! derived from the camera's vertical field of view, its distance, and the
//! display aspect ratio; free-particle spawning and pointer repulsion both
//! work in those world units, so the extents must be recomputed before the
//! next frame whenever the display or the camera distance changes.

use glam::{Mat4, Vec3};

/// Vertical field of view of the fixed camera, in degrees.
pub const FOV_DEGREES: f32 = 75.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// World-space width/height visible at the particle plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub width: f32,
    pub height: f32,
}

/// Maps display pixels to world units on the z = 0 plane.
#[derive(Debug, Clone)]
pub struct Viewport {
    display_width: f32,
    display_height: f32,
    camera_distance: f32,
    extents: Extents,
}

impl Viewport {
    /// Create a viewport for the given display size and camera distance.
    ///
    /// `display_height` must be non-zero; a zero initial height makes the
    /// aspect ratio undefined (guarded on [`Viewport::resize`], asserted
    /// here).
    pub fn new(display_width: f32, display_height: f32, camera_distance: f32) -> Self {
        debug_assert!(display_height > 0.0);
        let mut viewport = Self {
            display_width,
            display_height,
            camera_distance,
            extents: Extents {
                width: 0.0,
                height: 0.0,
            },
        };
        viewport.recompute();
        viewport
    }

    fn recompute(&mut self) {
        let aspect = self.display_width / self.display_height;
        let v_fov = FOV_DEGREES.to_radians();
        let height = 2.0 * (v_fov / 2.0).tan() * self.camera_distance;
        self.extents = Extents {
            width: height * aspect,
            height,
        };
    }

    /// Update the display size. A zero dimension is ignored and the previous
    /// extents are kept, so a minimized window cannot poison the aspect.
    pub fn resize(&mut self, display_width: f32, display_height: f32) {
        if display_width <= 0.0 || display_height <= 0.0 {
            return;
        }
        self.display_width = display_width;
        self.display_height = display_height;
        self.recompute();
    }

    /// Move the camera along the z axis and recompute the extents.
    pub fn set_camera_distance(&mut self, distance: f32) {
        self.camera_distance = distance;
        self.recompute();
    }

    /// Current visible world extents at the particle plane.
    #[inline]
    pub fn world_extents(&self) -> Extents {
        self.extents
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.display_width / self.display_height
    }

    #[inline]
    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    /// Map a pointer position in display pixels (origin top-left) to world
    /// coordinates on the particle plane.
    pub fn pointer_to_world(&self, pixel_x: f32, pixel_y: f32) -> Vec3 {
        let x = ((pixel_x / self.display_width) * 2.0 - 1.0) * self.extents.width / 2.0;
        let y = (-(pixel_y / self.display_height) * 2.0 + 1.0) * self.extents.height / 2.0;
        Vec3::new(x, y, 0.0)
    }

    /// View-projection matrix for the fixed camera looking down the z axis.
    pub fn view_proj(&self) -> Mat4 {
        let eye = Vec3::new(0.0, 0.0, self.camera_distance);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_DEGREES.to_radians(), self.aspect(), NEAR, FAR);
        proj * view
    }
}
