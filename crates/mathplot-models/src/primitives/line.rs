//! Line primitives: flat ribbons with miter joins, rounded and capped end
//! variants, dashed lines and the octagonal-section line with depth.

use glam::{Quat, Vec2, Vec3};

use crate::VertexBuffers;

/// Intersection of two 2-D lines given as point + direction.
///
/// Returns `None` when the directions are colinear.
fn line_intersection_2d(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<Vec2> {
    let denom = d1.perp_dot(d2);
    if denom.abs() < 1e-8 {
        return None;
    }
    let t = (p2 - p1).perp_dot(d2) / denom;
    Some(p1 + d1 * t)
}

impl VertexBuffers {
    /// Appends a flat ribbon of `width` from `start` to `end`, lying in the
    /// plane perpendicular to `up`. Four vertices, two triangles.
    pub fn flat_line(&mut self, start: Vec3, end: Vec3, up: Vec3, colour: Vec3, width: f32) {
        self.flat_line_mitred(None, start, end, None, up, colour, width);
    }

    /// Flat ribbon whose ends are mitred against the previous and next
    /// polyline points.
    ///
    /// The ribbon edges are found by intersecting the parallel offsets of
    /// the neighbouring segments with those of the current segment, in the
    /// 2-D plane defined by `up`; colinear joins fall back to the straight
    /// offsets.
    #[allow(clippy::too_many_arguments)]
    pub fn flat_line_mitred(
        &mut self,
        prev: Option<Vec3>,
        start: Vec3,
        end: Vec3,
        next: Option<Vec3>,
        up: Vec3,
        colour: Vec3,
        width: f32,
    ) {
        let up = up.normalize_or_zero();
        // Rotate the working plane onto z = const, do the offsets in 2-D,
        // then rotate the corners back.
        let q = Quat::from_rotation_arc(up, Vec3::Z);
        let to2d = |p: Vec3| {
            let r = q * p;
            Vec2::new(r.x, r.y)
        };
        let plane_z = (q * start).z;
        let from2d = |p: Vec2| q.conjugate() * Vec3::new(p.x, p.y, plane_z);

        let s2 = to2d(start);
        let e2 = to2d(end);
        let d = (e2 - s2).normalize_or_zero();
        let n = Vec2::new(-d.y, d.x);
        let hw = width * 0.5;

        let corner = |at: Vec2, neighbour: Option<Vec3>, incoming: bool, side: f32| -> Vec2 {
            let fallback = at + n * side * hw;
            let Some(nb) = neighbour else { return fallback };
            let nb2 = to2d(nb);
            let nd = if incoming {
                (at - nb2).normalize_or_zero()
            } else {
                (nb2 - at).normalize_or_zero()
            };
            let nn = Vec2::new(-nd.y, nd.x);
            let anchor = if incoming { nb2 } else { at };
            line_intersection_2d(anchor + nn * side * hw, nd, s2 + n * side * hw, d)
                .unwrap_or(fallback)
        };

        let s_plus = corner(s2, prev, true, 1.0);
        let s_minus = corner(s2, prev, true, -1.0);
        let e_plus = corner(e2, next, false, 1.0);
        let e_minus = corner(e2, next, false, -1.0);

        let base = self.idx;
        for p in [s_minus, s_plus, e_plus, e_minus] {
            self.push_vertex(from2d(p), up, colour);
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    /// Flat ribbon with a disc fan prepended or appended at the rounded
    /// ends.
    #[allow(clippy::too_many_arguments)]
    pub fn flat_line_rounded(
        &mut self,
        start: Vec3,
        end: Vec3,
        up: Vec3,
        colour: Vec3,
        width: f32,
        round_start: bool,
        round_end: bool,
    ) {
        let up = up.normalize_or_zero();
        let axis = (end - start).normalize_or_zero();
        let side = axis.cross(up).normalize_or_zero();
        let hw = width * 0.5;
        if round_start {
            self.disc(start, side, axis, colour, hw, 12);
        }
        self.flat_line(start, end, up, colour, width);
        if round_end {
            self.disc(end, side, axis, colour, hw, 12);
        }
    }

    /// Flat ribbon with filled half-disc fans at either end.
    #[allow(clippy::too_many_arguments)]
    pub fn flat_line_capped(
        &mut self,
        start: Vec3,
        end: Vec3,
        up: Vec3,
        colour: Vec3,
        width: f32,
        cap_start: bool,
        cap_end: bool,
    ) {
        let up = up.normalize_or_zero();
        let axis = (end - start).normalize_or_zero();
        let side = axis.cross(up).normalize_or_zero();
        let hw = width * 0.5;
        if cap_start {
            self.half_disc(start, side, -axis, up, colour, hw, 8);
        }
        self.flat_line(start, end, up, colour, width);
        if cap_end {
            self.half_disc(end, -side, axis, up, colour, hw, 8);
        }
    }

    /// Half-disc fan from `+ux` through `+uy` to `-ux`.
    #[allow(clippy::too_many_arguments)]
    fn half_disc(
        &mut self,
        centre: Vec3,
        ux: Vec3,
        uy: Vec3,
        normal: Vec3,
        colour: Vec3,
        radius: f32,
        segments: u32,
    ) {
        let base = self.idx;
        self.push_vertex(centre, normal, colour);
        for j in 0..=segments {
            let t = std::f32::consts::PI * j as f32 / segments as f32;
            self.push_vertex(centre + (ux * t.cos() + uy * t.sin()) * radius, normal, colour);
        }
        for j in 0..segments {
            self.push_triangle(base, base + 1 + j, base + 2 + j);
        }
    }

    /// Dashed flat line: repeated short ribbon segments along the axis.
    /// The gap is `gap_prop` of the dash length.
    #[allow(clippy::too_many_arguments)]
    pub fn flat_dashed_line(
        &mut self,
        start: Vec3,
        end: Vec3,
        up: Vec3,
        colour: Vec3,
        width: f32,
        dash_len: f32,
        gap_prop: f32,
    ) {
        let full = end - start;
        let length = full.length();
        if length <= f32::EPSILON || dash_len <= f32::EPSILON {
            return;
        }
        let axis = full / length;
        let gap = dash_len * gap_prop.max(0.0);
        let mut t = 0.0;
        while t < length {
            let dash_end = (t + dash_len).min(length);
            self.flat_line(start + axis * t, start + axis * dash_end, up, colour, width);
            t = dash_end + gap;
        }
    }

    /// A line with depth: an octagonal cross-section extrusion whose corner
    /// angles derive from the width-to-thickness ratio. Behaves as a capped
    /// tube with a flattened cross-section. Emits 34 vertices and 96
    /// indices.
    #[allow(clippy::too_many_arguments)]
    pub fn line_round(
        &mut self,
        start: Vec3,
        end: Vec3,
        up: Vec3,
        colour: Vec3,
        width: f32,
        thickness: f32,
    ) {
        let axis = (end - start).normalize_or_zero();
        let up = up.normalize_or_zero();
        let ux = axis.cross(up).normalize_or_zero();
        let uy = axis.cross(ux).normalize_or_zero();
        let (hw, ht) = (width * 0.5, thickness * 0.5);

        // Corner angles from the cross-section aspect ratio.
        let a = ht.atan2(hw);
        let pi = std::f32::consts::PI;
        let angles = [
            0.0,
            a,
            pi / 2.0,
            pi - a,
            pi,
            pi + a,
            3.0 * pi / 2.0,
            2.0 * pi - a,
        ];
        let offset = |t: f32| ux * (hw * t.cos()) + uy * (ht * t.sin());
        let radial = |t: f32| (ux * (t.cos() / hw) + uy * (t.sin() / ht)).normalize_or_zero();

        let base = self.idx;
        let s = angles.len() as u32;

        self.push_vertex(start, -axis, colour);
        for &t in &angles {
            self.push_vertex(start + offset(t), -axis, colour);
        }
        for &t in &angles {
            self.push_vertex(start + offset(t), radial(t), colour);
        }
        for &t in &angles {
            self.push_vertex(end + offset(t), radial(t), colour);
        }
        for &t in &angles {
            self.push_vertex(end + offset(t), axis, colour);
        }
        self.push_vertex(end, axis, colour);

        let cap_start = base + 1;
        let side_start = cap_start + s;
        let side_end = side_start + s;
        let cap_end = side_end + s;
        let centre_end = cap_end + s;
        for j in 0..s {
            let k = (j + 1) % s;
            self.push_triangle(base, cap_start + k, cap_start + j);
            self.push_triangle(side_start + j, side_end + j, side_end + k);
            self.push_triangle(side_start + j, side_end + k, side_start + k);
            self.push_triangle(centre_end, cap_end + j, cap_end + k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_line_counts_and_width() {
        let mut vb = VertexBuffers::new();
        vb.flat_line(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE, 0.2);
        assert_eq!(vb.vertex_count(), 4);
        assert_eq!(vb.indices.len(), 6);
        let bb = vb.bounding_box().unwrap();
        assert!((bb.extents().y - 0.2).abs() < 1e-6);
        assert!((bb.extents().x - 1.0).abs() < 1e-6);
        vb.check().unwrap();
    }

    #[test]
    fn test_mitred_right_angle_corner() {
        // Polyline (0,0) -> (1,0) -> (1,1): the outer miter corner of the
        // first segment's end sits at x = 1 +- w/2 depending on side.
        let mut vb = VertexBuffers::new();
        vb.flat_line_mitred(
            None,
            Vec3::ZERO,
            Vec3::X,
            Some(Vec3::new(1.0, 1.0, 0.0)),
            Vec3::Z,
            Vec3::ONE,
            0.2,
        );
        assert_eq!(vb.vertex_count(), 4);
        // End corners: the +n side (y = +0.1) meets the next segment's
        // offset at x = 0.9; the -n side at x = 1.1.
        let e_plus = vb.position(2);
        let e_minus = vb.position(3);
        assert!((e_plus.y - 0.1).abs() < 1e-5 && (e_plus.x - 0.9).abs() < 1e-5);
        assert!((e_minus.y + 0.1).abs() < 1e-5 && (e_minus.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_mitred_colinear_falls_back_to_straight_offsets() {
        let mut vb = VertexBuffers::new();
        vb.flat_line_mitred(
            Some(-Vec3::X),
            Vec3::ZERO,
            Vec3::X,
            Some(Vec3::X * 2.0),
            Vec3::Z,
            Vec3::ONE,
            0.2,
        );
        let s_minus = vb.position(0);
        let s_plus = vb.position(1);
        assert!((s_plus - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-5);
        assert!((s_minus - Vec3::new(0.0, -0.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rounded_adds_disc_fans() {
        let mut vb = VertexBuffers::new();
        vb.flat_line_rounded(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE, 0.2, true, true);
        // Two 12-segment discs (13 verts each) plus the ribbon.
        assert_eq!(vb.vertex_count(), 13 + 4 + 13);
        vb.check().unwrap();
    }

    #[test]
    fn test_dashed_line_dash_count() {
        let mut vb = VertexBuffers::new();
        // Length 1, dash 0.2, gap 0.2 -> dashes start at 0.0, 0.4, 0.8.
        vb.flat_dashed_line(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE, 0.05, 0.2, 1.0);
        assert_eq!(vb.vertex_count(), 3 * 4);
        vb.check().unwrap();
    }

    #[test]
    fn test_line_round_counts_and_extents() {
        let mut vb = VertexBuffers::new();
        vb.line_round(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE, 0.4, 0.1);
        assert_eq!(vb.vertex_count(), 34);
        assert_eq!(vb.indices.len(), 96);
        let bb = vb.bounding_box().unwrap();
        assert!((bb.extents().y - 0.4).abs() < 1e-5);
        assert!((bb.extents().z - 0.1).abs() < 1e-5);
        vb.check().unwrap();
    }
}
