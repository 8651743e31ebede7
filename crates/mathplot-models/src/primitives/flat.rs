//! Flat primitives: quads, polygons, rhombohedra, cuboids, rings and
//! circle outlines.

use glam::Vec3;

use crate::VertexBuffers;

impl VertexBuffers {
    /// Appends a filled disc fan: a centre vertex plus `segments` rim
    /// vertices in the plane spanned by `ux`, `uy`.
    pub fn disc(
        &mut self,
        centre: Vec3,
        ux: Vec3,
        uy: Vec3,
        colour: Vec3,
        radius: f32,
        segments: u32,
    ) {
        let normal = ux.cross(uy).normalize_or_zero();
        let base = self.idx;
        self.push_vertex(centre, normal, colour);
        for j in 0..segments {
            let t = std::f32::consts::TAU * j as f32 / segments as f32;
            self.push_vertex(centre + (ux * t.cos() + uy * t.sin()) * radius, normal, colour);
        }
        for j in 0..segments {
            let k = (j + 1) % segments;
            self.push_triangle(base, base + 1 + j, base + 1 + k);
        }
    }

    /// Appends a flat quad with corners in winding order. The single
    /// normal comes from the first two edges.
    pub fn flat_quad(&mut self, corners: [Vec3; 4], colour: Vec3) {
        let normal = (corners[1] - corners[0])
            .cross(corners[3] - corners[0])
            .normalize_or_zero();
        let base = self.idx;
        for c in corners {
            self.push_vertex(c, normal, colour);
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    /// Appends a convex flat polygon as a fan about `centre`. `points` are
    /// the rim positions in winding order; the single normal comes from the
    /// first two rim edges.
    pub fn flat_poly(&mut self, centre: Vec3, points: &[Vec3], colour: Vec3) {
        if points.len() < 3 {
            log::warn!("flat_poly: {} rim points, nothing emitted", points.len());
            return;
        }
        let normal = (points[1] - points[0])
            .cross(points[2] - points[1])
            .normalize_or_zero();
        let base = self.idx;
        self.push_vertex(centre, normal, colour);
        for &p in points {
            self.push_vertex(p, normal, colour);
        }
        let n = points.len() as u32;
        for j in 0..n {
            let k = (j + 1) % n;
            self.push_triangle(base, base + 1 + j, base + 1 + k);
        }
    }

    /// Appends a rhombohedron: the parallelepiped spanned by three edge
    /// vectors from `origin`, as six flat quads with per-face normals.
    pub fn rhombus(&mut self, origin: Vec3, e1: Vec3, e2: Vec3, e3: Vec3, colour: Vec3) {
        let o = origin;
        // Bottom (-e3 side), top, then the four sides.
        self.flat_quad([o, o + e2, o + e1 + e2, o + e1], colour);
        self.flat_quad([o + e3, o + e1 + e3, o + e1 + e2 + e3, o + e2 + e3], colour);
        self.flat_quad([o, o + e1, o + e1 + e3, o + e3], colour);
        self.flat_quad([o + e2, o + e2 + e3, o + e1 + e2 + e3, o + e1 + e2], colour);
        self.flat_quad([o, o + e3, o + e2 + e3, o + e2], colour);
        self.flat_quad([o + e1, o + e1 + e2, o + e1 + e2 + e3, o + e1 + e3], colour);
    }

    /// Appends an axis-aligned cuboid centred at `centre` with the given
    /// side widths.
    pub fn cuboid(&mut self, centre: Vec3, widths: Vec3, colour: Vec3) {
        let origin = centre - widths * 0.5;
        self.rhombus(
            origin,
            Vec3::X * widths.x,
            Vec3::Y * widths.y,
            Vec3::Z * widths.z,
            colour,
        );
    }

    /// Appends a flat annulus in the z = 0 plane of `centre`, mid-radius
    /// `radius` and radial thickness `thickness`.
    pub fn ring(&mut self, centre: Vec3, colour: Vec3, radius: f32, thickness: f32, segments: u32) {
        self.ring_inner_outer(
            centre,
            colour,
            radius - thickness * 0.5,
            radius + thickness * 0.5,
            segments,
        );
    }

    /// Annulus specified by inner and outer radii directly.
    pub fn ring_inner_outer(
        &mut self,
        centre: Vec3,
        colour: Vec3,
        inner: f32,
        outer: f32,
        segments: u32,
    ) {
        self.oriented_ring(centre, Vec3::Z, Vec3::X, colour, inner, outer, segments);
    }

    /// Appends a flat circle outline: an annulus oriented by an explicit
    /// plane `normal` and an in-plane reference vector.
    #[allow(clippy::too_many_arguments)]
    pub fn circle_outline(
        &mut self,
        centre: Vec3,
        normal: Vec3,
        inplane: Vec3,
        colour: Vec3,
        radius: f32,
        thickness: f32,
        segments: u32,
    ) {
        self.oriented_ring(
            centre,
            normal,
            inplane,
            colour,
            radius - thickness * 0.5,
            radius + thickness * 0.5,
            segments,
        );
    }

    /// Shared annulus generator. Emits `2 * segments` vertices and
    /// `6 * segments` indices.
    #[allow(clippy::too_many_arguments)]
    fn oriented_ring(
        &mut self,
        centre: Vec3,
        normal: Vec3,
        inplane: Vec3,
        colour: Vec3,
        inner: f32,
        outer: f32,
        segments: u32,
    ) {
        let normal = normal.normalize_or_zero();
        let ux = (inplane - normal * inplane.dot(normal)).normalize_or_zero();
        let uy = normal.cross(ux);
        let base = self.idx;
        let s = segments;
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(centre + radial * inner, normal, colour);
            self.push_vertex(centre + radial * outer, normal, colour);
        }
        for j in 0..s {
            let k = (j + 1) % s;
            let (i0, o0) = (base + 2 * j, base + 2 * j + 1);
            let (i1, o1) = (base + 2 * k, base + 2 * k + 1);
            self.push_triangle(i0, o0, o1);
            self.push_triangle(i0, o1, i1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_quad_counts_and_normal() {
        let mut vb = VertexBuffers::new();
        vb.flat_quad(
            [
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::Y,
            ],
            Vec3::ONE,
        );
        assert_eq!(vb.vertex_count(), 4);
        assert_eq!(vb.indices.len(), 6);
        // All four normals are the same plane normal.
        for i in 0..4 {
            let n = Vec3::new(vb.normals[3 * i], vb.normals[3 * i + 1], vb.normals[3 * i + 2]);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.x.abs() < 1e-6 && n.y.abs() < 1e-6);
        }
        vb.check().unwrap();
    }

    #[test]
    fn test_flat_poly_fan_counts() {
        let mut vb = VertexBuffers::new();
        let rim: Vec<Vec3> = (0..6)
            .map(|j| {
                let t = std::f32::consts::TAU * j as f32 / 6.0;
                Vec3::new(t.cos(), t.sin(), 0.0)
            })
            .collect();
        vb.flat_poly(Vec3::ZERO, &rim, Vec3::X);
        assert_eq!(vb.vertex_count(), 7);
        assert_eq!(vb.indices.len(), 18);
        vb.check().unwrap();
    }

    #[test]
    fn test_flat_poly_degenerate_is_noop() {
        let mut vb = VertexBuffers::new();
        vb.flat_poly(Vec3::ZERO, &[Vec3::X, Vec3::Y], Vec3::ONE);
        assert!(vb.is_empty());
    }

    #[test]
    fn test_cuboid_counts_and_bb() {
        let mut vb = VertexBuffers::new();
        vb.cuboid(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), Vec3::ONE);
        assert_eq!(vb.vertex_count(), 24);
        assert_eq!(vb.indices.len(), 36);
        let bb = vb.bounding_box().unwrap();
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bb.max, Vec3::new(1.0, 2.0, 3.0));
        vb.check().unwrap();
    }

    #[test]
    fn test_ring_counts() {
        let mut vb = VertexBuffers::new();
        vb.ring(Vec3::ZERO, Vec3::ONE, 1.0, 0.2, 24);
        assert_eq!(vb.vertex_count(), 48);
        assert_eq!(vb.indices.len(), 144);
        let bb = vb.bounding_box().unwrap();
        assert!((bb.max.x - 1.1).abs() < 1e-5);
        vb.check().unwrap();
    }

    #[test]
    fn test_circle_outline_oriented_in_plane() {
        let mut vb = VertexBuffers::new();
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        vb.circle_outline(Vec3::ZERO, normal, Vec3::Z, Vec3::ONE, 1.0, 0.1, 16);
        for i in 0..vb.vertex_count() {
            assert!(vb.position(i).dot(normal).abs() < 1e-5);
        }
    }
}
