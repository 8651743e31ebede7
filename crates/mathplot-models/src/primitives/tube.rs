//! Tube primitives: capped, flared and open variants.

use glam::Vec3;

use super::{orthonormal_pair, random_inplane_pair};
use crate::VertexBuffers;

impl VertexBuffers {
    /// Appends a capped tube from `start` to `end`.
    ///
    /// The cap orientation (in-plane basis) is sampled at random; use
    /// [`VertexBuffers::tube_oriented`] for deterministic output. Emits
    /// `4 * segments + 2` vertices and `12 * segments` indices.
    pub fn tube(
        &mut self,
        start: Vec3,
        end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        radius: f32,
        segments: u32,
    ) {
        let (ux, uy) = random_inplane_pair(end - start);
        self.flared_tube_oriented(start, end, col_start, col_end, ux, uy, radius, radius, segments);
    }

    /// Appends a capped tube with an explicit end-cap orientation given by
    /// the orthogonal in-plane unit vectors `ux`, `uy`.
    pub fn tube_oriented(
        &mut self,
        start: Vec3,
        end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        ux: Vec3,
        uy: Vec3,
        radius: f32,
        segments: u32,
    ) {
        self.flared_tube_oriented(start, end, col_start, col_end, ux, uy, radius, radius, segments);
    }

    /// Appends a capped tube whose radius varies linearly from
    /// `radius_start` to `radius_end`. Reduces to [`VertexBuffers::tube`]
    /// when the radii are equal.
    pub fn flared_tube(
        &mut self,
        start: Vec3,
        end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        radius_start: f32,
        radius_end: f32,
        segments: u32,
    ) {
        let (ux, uy) = random_inplane_pair(end - start);
        self.flared_tube_oriented(
            start,
            end,
            col_start,
            col_end,
            ux,
            uy,
            radius_start,
            radius_end,
            segments,
        );
    }

    /// Appends a flared tube specified by a flare angle in radians rather
    /// than an end radius.
    pub fn flared_tube_angle(
        &mut self,
        start: Vec3,
        end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        radius: f32,
        flare: f32,
        segments: u32,
    ) {
        let radius_end = radius + flare.tan() * (end - start).length();
        self.flared_tube(start, end, col_start, col_end, radius, radius_end, segments);
    }

    /// The full capped-tube generator.
    ///
    /// Vertex layout: start fan centre, start cap ring (axial normals),
    /// start side ring (radial normals), end side ring, end cap ring, end
    /// fan centre. Ring vertices are duplicated between cap and side so the
    /// caps shade flat while the side shades smooth.
    #[allow(clippy::too_many_arguments)]
    pub fn flared_tube_oriented(
        &mut self,
        start: Vec3,
        end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        ux: Vec3,
        uy: Vec3,
        radius_start: f32,
        radius_end: f32,
        segments: u32,
    ) {
        let axis = (end - start).normalize_or_zero();
        let base = self.idx;
        let s = segments;

        self.push_vertex(start, -axis, col_start);
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(start + radial * radius_start, -axis, col_start);
        }
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(start + radial * radius_start, radial, col_start);
        }
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(end + radial * radius_end, radial, col_end);
        }
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(end + radial * radius_end, axis, col_end);
        }
        self.push_vertex(end, axis, col_end);

        let cap_start = base + 1;
        let side_start = cap_start + s;
        let side_end = side_start + s;
        let cap_end = side_end + s;
        let centre_end = cap_end + s;

        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(base, cap_start + k, cap_start + j);
        }
        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(side_start + j, side_end + j, side_end + k);
            self.push_triangle(side_start + j, side_end + k, side_start + k);
        }
        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(centre_end, cap_end + j, cap_end + k);
        }
    }

    /// Appends an open (uncapped) tube whose end rings are tilted into the
    /// planes perpendicular to `face_start` and `face_end`. Used to join
    /// consecutive tube segments seamlessly. Emits `2 * segments` vertices
    /// and `6 * segments` indices.
    #[allow(clippy::too_many_arguments)]
    pub fn open_tube(
        &mut self,
        start: Vec3,
        end: Vec3,
        face_start: Vec3,
        face_end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        radius: f32,
        segments: u32,
    ) {
        self.open_flared_tube(
            start, end, face_start, face_end, col_start, col_end, radius, radius, segments,
        );
    }

    /// Open tube with distinct start and end radii.
    #[allow(clippy::too_many_arguments)]
    pub fn open_flared_tube(
        &mut self,
        start: Vec3,
        end: Vec3,
        face_start: Vec3,
        face_end: Vec3,
        col_start: Vec3,
        col_end: Vec3,
        radius_start: f32,
        radius_end: f32,
        segments: u32,
    ) {
        let axis = (end - start).normalize_or_zero();
        let (ux, uy) = orthonormal_pair(axis);
        let base = self.idx;
        let s = segments;

        // Each ring vertex is sheared along the axis so the ring lies in the
        // plane perpendicular to the requested face normal.
        let ring = |centre: Vec3, face: Vec3, radius: f32, col: Vec3, vb: &mut Self| {
            let face = face.normalize_or_zero();
            let denom = axis.dot(face);
            for j in 0..s {
                let t = std::f32::consts::TAU * j as f32 / s as f32;
                let radial = ux * t.cos() + uy * t.sin();
                let offset = radial * radius;
                let shear = if denom.abs() > 1e-6 {
                    axis * (-offset.dot(face) / denom)
                } else {
                    Vec3::ZERO
                };
                vb.push_vertex(centre + offset + shear, radial, col);
            }
        };
        ring(start, face_start, radius_start, col_start, self);
        ring(end, face_end, radius_end, col_end, self);

        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(base + j, base + s + j, base + s + k);
            self.push_triangle(base + j, base + s + k, base + k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tube_vertex_and_index_counts() {
        for segments in [3u32, 8, 12, 20] {
            let mut vb = VertexBuffers::new();
            vb.tube(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y, 0.1, segments);
            assert_eq!(vb.vertex_count(), 4 * segments + 2);
            assert_eq!(vb.indices.len() as u32, 12 * segments);
            vb.check().unwrap();
        }
    }

    #[test]
    fn test_tube_bounding_box_spans_endpoints() {
        let mut vb = VertexBuffers::new();
        vb.tube(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec3::X, Vec3::X, 0.25, 16);
        let bb = vb.bounding_box().unwrap();
        assert!(bb.min.z <= 0.0 && bb.max.z >= 2.0);
        assert!(bb.max.x <= 0.25 + 1e-5 && bb.min.x >= -0.25 - 1e-5);
    }

    #[test]
    fn test_flared_tube_equal_radii_matches_tube_counts() {
        let mut vb = VertexBuffers::new();
        vb.flared_tube(Vec3::ZERO, Vec3::Y, Vec3::X, Vec3::X, 0.1, 0.1, 9);
        assert_eq!(vb.vertex_count(), 4 * 9 + 2);
    }

    #[test]
    fn test_open_tube_counts() {
        let mut vb = VertexBuffers::new();
        vb.open_tube(
            Vec3::ZERO,
            Vec3::Z,
            -Vec3::Z,
            Vec3::Z,
            Vec3::X,
            Vec3::X,
            0.1,
            10,
        );
        assert_eq!(vb.vertex_count(), 20);
        assert_eq!(vb.indices.len(), 60);
        vb.check().unwrap();
    }

    #[test]
    fn test_open_tube_tilted_ring_lies_in_face_plane() {
        let mut vb = VertexBuffers::new();
        let face = Vec3::new(0.5, 0.0, 1.0).normalize();
        vb.open_tube(Vec3::ZERO, Vec3::Z, face, Vec3::Z, Vec3::X, Vec3::X, 0.2, 12);
        // First ring vertices must satisfy (p - start) . face == 0.
        for j in 0..12 {
            let p = vb.position(j);
            assert!(p.dot(face).abs() < 1e-5);
        }
    }

    #[test]
    fn test_successive_primitives_accumulate() {
        let mut vb = VertexBuffers::new();
        vb.tube(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::X, 0.1, 6);
        let first = vb.vertex_count();
        vb.tube(Vec3::Z, Vec3::Z * 2.0, Vec3::X, Vec3::X, 0.1, 6);
        assert_eq!(vb.vertex_count(), 2 * first);
        vb.check().unwrap();
    }
}
