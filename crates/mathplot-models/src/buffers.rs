//! CPU-side vertex and index storage.
//!
//! A [`VertexBuffers`] holds the three parallel stride-3 float sequences
//! (positions, normals, colours) plus the triangle index stream, exactly as
//! they are uploaded to the GPU. The `idx` cursor is the next free vertex
//! index; every geometry primitive appends vertices and advances it, so
//! successive primitive calls accumulate into one buffer set without index
//! collisions.

use glam::Vec3;
use mathplot_core::{MathplotError, Result};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl BoundingBox {
    /// The box enclosing a flat stride-3 position sequence.
    pub fn from_positions(positions: &[f32]) -> Result<Self> {
        if positions.is_empty() {
            return Err(MathplotError::EmptyModel);
        }
        if positions.len() % 3 != 0 {
            return Err(MathplotError::SizeMismatch {
                expected: positions.len() / 3 * 3,
                actual: positions.len(),
            });
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in positions.chunks_exact(3) {
            let v = Vec3::new(p[0], p[1], p[2]);
            min = min.min(v);
            max = max.max(v);
        }
        Ok(Self { min, max })
    }

    /// Centre of the box.
    #[must_use]
    pub fn mid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    #[must_use]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corner positions.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// Whether `p` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// CPU vertex/index arrays for one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffers {
    /// Flat xyz position sequence.
    pub positions: Vec<f32>,
    /// Flat xyz normal sequence, parallel to `positions`.
    pub normals: Vec<f32>,
    /// Flat rgb colour sequence, parallel to `positions`.
    pub colors: Vec<f32>,
    /// Triangle index stream; three entries per triangle.
    pub indices: Vec<u32>,
    /// Next free vertex index.
    pub idx: u32,
}

impl VertexBuffers {
    /// An empty buffer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices accumulated.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.idx
    }

    /// Appends one vertex and advances the cursor.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, colour: Vec3) {
        self.positions.extend_from_slice(&[position.x, position.y, position.z]);
        self.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        self.colors.extend_from_slice(&[colour.x, colour.y, colour.z]);
        self.idx += 1;
    }

    /// Appends one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Clears all arrays and resets the cursor.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.colors.clear();
        self.indices.clear();
        self.idx = 0;
    }

    /// Whether no vertices have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idx == 0
    }

    /// Verifies the structural invariants: parallel sequences of equal
    /// length, index stream a multiple of three, every index in range.
    pub fn check(&self) -> Result<()> {
        if self.positions.len() != self.normals.len() || self.positions.len() != self.colors.len()
        {
            return Err(MathplotError::BufferSizeMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
                colors: self.colors.len(),
            });
        }
        if self.positions.len() % 3 != 0 {
            return Err(MathplotError::SizeMismatch {
                expected: self.positions.len() / 3 * 3,
                actual: self.positions.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MathplotError::SizeMismatch {
                expected: self.indices.len() / 3 * 3,
                actual: self.indices.len(),
            });
        }
        let n = self.idx;
        if self.positions.len() as u32 != 3 * n {
            return Err(MathplotError::SizeMismatch {
                expected: (3 * n) as usize,
                actual: self.positions.len(),
            });
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i >= n) {
            return Err(MathplotError::SizeMismatch {
                expected: n as usize,
                actual: bad as usize,
            });
        }
        Ok(())
    }

    /// The axis-aligned bounding box of the accumulated positions.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        BoundingBox::from_positions(&self.positions)
    }

    /// Position of vertex `i`.
    #[must_use]
    pub fn position(&self, i: u32) -> Vec3 {
        let i = 3 * i as usize;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    /// Overwrites the colour of vertex `i`. Used by colour-only updates.
    pub fn set_colour(&mut self, i: u32, colour: Vec3) {
        let i = 3 * i as usize;
        self.colors[i] = colour.x;
        self.colors[i + 1] = colour.y;
        self.colors[i + 2] = colour.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_vertex_advances_cursor() {
        let mut vb = VertexBuffers::new();
        vb.push_vertex(Vec3::X, Vec3::Y, Vec3::Z);
        vb.push_vertex(Vec3::ZERO, Vec3::Y, Vec3::ONE);
        assert_eq!(vb.idx, 2);
        assert_eq!(vb.positions.len(), 6);
        vb.check().unwrap();
    }

    #[test]
    fn test_check_rejects_out_of_range_index() {
        let mut vb = VertexBuffers::new();
        vb.push_vertex(Vec3::ZERO, Vec3::Z, Vec3::ONE);
        vb.push_triangle(0, 0, 1);
        assert!(vb.check().is_err());
    }

    #[test]
    fn test_bounding_box_single_vertex() {
        let mut vb = VertexBuffers::new();
        vb.push_vertex(Vec3::new(5.0, 0.0, 0.0), Vec3::Z, Vec3::ONE);
        vb.push_triangle(0, 0, 0);
        let bb = vb.bounding_box().unwrap();
        assert_eq!(bb.min, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(bb.max, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounding_box_empty_is_error() {
        let vb = VertexBuffers::new();
        assert!(vb.bounding_box().is_err());
    }

    #[test]
    fn test_bounding_box_contains_all_vertices() {
        let mut vb = VertexBuffers::new();
        for i in 0..10 {
            let p = Vec3::new(i as f32, -(i as f32), 0.5 * i as f32);
            vb.push_vertex(p, Vec3::Z, Vec3::ONE);
        }
        let bb = vb.bounding_box().unwrap();
        for i in 0..vb.idx {
            assert!(bb.contains(vb.position(i)));
        }
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut vb = VertexBuffers::new();
        vb.push_vertex(Vec3::ONE, Vec3::Z, Vec3::ONE);
        vb.clear();
        assert!(vb.is_empty());
        assert!(vb.positions.is_empty());
    }
}
