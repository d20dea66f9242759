//! CPU staging for GPU-bound vertex attributes.
//!
//! Each population exposes three flat attribute arrays (position xyz, size,
//! alpha). The simulation mutates `Vec3` positions in place; after a step the
//! engine copies them into the position staging array and marks it dirty.
//! Size and alpha are written at spawn/resize time and re-marked only when a
//! range-change command rewrites them. The GPU layer uploads whatever is
//! dirty and clears the flags.

use glam::Vec3;

/// A flat `f32` attribute array plus its upload-dirty flag.
#[derive(Debug, Clone)]
pub struct AttributeBuffer {
    data: Vec<f32>,
    dirty: bool,
}

impl AttributeBuffer {
    /// A zero-filled buffer of `len` floats, marked dirty so the first
    /// upload sees it.
    pub fn with_len(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
            dirty: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the raw floats; marks the buffer dirty.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.dirty = true;
        &mut self.data
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag. The GPU layer calls this once per
    /// frame to gate uploads.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Copy `positions` into the buffer at fixed 3-float slots and mark it
    /// dirty. Lengths must match (`data.len() == positions.len() * 3`).
    pub fn sync_positions(&mut self, positions: &[Vec3]) {
        debug_assert_eq!(self.data.len(), positions.len() * 3);
        for (slot, p) in self.data.chunks_exact_mut(3).zip(positions) {
            slot[0] = p.x;
            slot[1] = p.y;
            slot[2] = p.z;
        }
        self.dirty = true;
    }
}

/// The per-population attribute set consumed by the renderer.
#[derive(Debug, Clone)]
pub struct VertexAttributes {
    pub positions: AttributeBuffer,
    pub sizes: AttributeBuffer,
    pub alphas: AttributeBuffer,
}

impl VertexAttributes {
    /// Buffers for `count` particles.
    pub fn with_count(count: usize) -> Self {
        Self {
            positions: AttributeBuffer::with_len(count * 3),
            sizes: AttributeBuffer::with_len(count),
            alphas: AttributeBuffer::with_len(count),
        }
    }

    /// Particle count implied by the attribute lengths.
    #[inline]
    pub fn count(&self) -> usize {
        self.sizes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_starts_dirty() {
        let mut buffer = AttributeBuffer::with_len(6);
        assert!(buffer.is_dirty());
        assert!(buffer.take_dirty());
        assert!(!buffer.is_dirty());
        assert!(!buffer.take_dirty());
    }

    #[test]
    fn test_sync_positions_copies_and_marks() {
        let mut buffer = AttributeBuffer::with_len(6);
        buffer.take_dirty();

        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 5.0, -6.0)];
        buffer.sync_positions(&positions);

        assert_eq!(buffer.as_slice(), &[1.0, 2.0, 3.0, -4.0, 5.0, -6.0]);
        assert!(buffer.take_dirty());
    }

    #[test]
    fn test_mut_access_marks_dirty() {
        let mut buffer = AttributeBuffer::with_len(2);
        buffer.take_dirty();
        buffer.as_mut_slice()[0] = 9.0;
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_vertex_attributes_lengths() {
        let attrs = VertexAttributes::with_count(5);
        assert_eq!(attrs.positions.len(), 15);
        assert_eq!(attrs.sizes.len(), 5);
        assert_eq!(attrs.alphas.len(), 5);
        assert_eq!(attrs.count(), 5);
    }
}
