//! Cone and arrow primitives.

use glam::Vec3;

use super::random_inplane_pair;
use crate::VertexBuffers;

impl VertexBuffers {
    /// Appends a cone from a base disc at `centre` to an apex at `tip`.
    ///
    /// `ringoffset` shifts the base ring along the axis, which leaves a gap
    /// between a parent tube and the conical tip of an arrow. Emits
    /// `3 * segments + 2` vertices and `12 * segments` indices.
    pub fn cone(
        &mut self,
        centre: Vec3,
        tip: Vec3,
        ringoffset: f32,
        colour: Vec3,
        radius: f32,
        segments: u32,
    ) {
        let axis = (tip - centre).normalize_or_zero();
        let base_centre = centre + axis * ringoffset;
        let height = (tip - base_centre).length();
        let (ux, uy) = random_inplane_pair(axis);
        let base = self.idx;
        let s = segments;

        // Slanted side normal: radial component scaled by height, axial by
        // radius.
        let side_normal = |radial: Vec3| (radial * height + axis * radius).normalize_or_zero();

        self.push_vertex(base_centre, -axis, colour);
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(base_centre + radial * radius, -axis, colour);
        }
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(base_centre + radial * radius, side_normal(radial), colour);
        }
        for j in 0..s {
            let t = std::f32::consts::TAU * j as f32 / s as f32;
            let radial = ux * t.cos() + uy * t.sin();
            self.push_vertex(tip, side_normal(radial), colour);
        }
        self.push_vertex(tip, axis, colour);

        let fan_ring = base + 1;
        let side_ring = fan_ring + s;
        let tip_ring = side_ring + s;
        let apex = tip_ring + s;

        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(base, fan_ring + k, fan_ring + j);
        }
        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(side_ring + j, tip_ring + j, tip_ring + k);
            self.push_triangle(side_ring + j, tip_ring + k, side_ring + k);
        }
        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(apex, tip_ring + j, tip_ring + k);
        }
    }

    /// Appends an arrow from `start` to `end`: a tube shaft capped by a
    /// conical head.
    ///
    /// Negative radii are auto-derived from the arrow length (shaft
    /// length/40, head twice the shaft). `head_prop` is the proportion of
    /// the total length occupied by the head.
    #[allow(clippy::too_many_arguments)]
    pub fn arrow(
        &mut self,
        start: Vec3,
        end: Vec3,
        colour: Vec3,
        shaft_radius: f32,
        head_radius: f32,
        head_prop: f32,
        segments: u32,
    ) {
        let full = end - start;
        let length = full.length();
        if length <= f32::EPSILON {
            log::warn!("arrow: zero length, nothing emitted");
            return;
        }
        let shaft_radius = if shaft_radius < 0.0 {
            length / 40.0
        } else {
            shaft_radius
        };
        let head_radius = if head_radius < 0.0 {
            shaft_radius * 2.0
        } else {
            head_radius
        };
        let head_prop = head_prop.clamp(0.0, 1.0);
        let neck = start + full * (1.0 - head_prop);
        self.tube(start, neck, colour, colour, shaft_radius, segments);
        self.cone(neck, end, 0.0, colour, head_radius, segments);
    }
}
