//! Sphere primitives: latitude/longitude grids, geodesic subdivision and
//! the icosahedron.

use std::collections::HashMap;

use glam::Vec3;

use crate::VertexBuffers;

/// Unit icosahedron vertices (unnormalized golden-ratio coordinates).
fn icosa_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Icosahedron faces, outward CCW winding.
const ICOSA_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Midpoint-subdivided icosphere topology on the unit sphere.
fn geodesic_topology(iterations: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let mut vertices: Vec<Vec3> = icosa_vertices().iter().map(|v| v.normalize()).collect();
    let mut faces: Vec<[u32; 3]> = ICOSA_FACES.to_vec();

    for _ in 0..iterations {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next_faces = Vec::with_capacity(faces.len() * 4);
        for face in &faces {
            let mut mid = [0u32; 3];
            for e in 0..3 {
                let (a, b) = (face[e], face[(e + 1) % 3]);
                let key = (a.min(b), a.max(b));
                mid[e] = *midpoints.entry(key).or_insert_with(|| {
                    let m = (vertices[a as usize] + vertices[b as usize]).normalize();
                    vertices.push(m);
                    (vertices.len() - 1) as u32
                });
            }
            next_faces.push([face[0], mid[0], mid[2]]);
            next_faces.push([face[1], mid[1], mid[0]]);
            next_faces.push([face[2], mid[2], mid[1]]);
            next_faces.push([mid[0], mid[1], mid[2]]);
        }
        faces = next_faces;
    }
    (vertices, faces)
}

impl VertexBuffers {
    /// Appends a latitude/longitude sphere with `rings` latitudinal bands
    /// and `segments` longitudinal steps.
    ///
    /// Emits `(rings - 1) * segments + 2` vertices and
    /// `6 * segments * (rings - 1)` indices.
    pub fn sphere(&mut self, centre: Vec3, colour: Vec3, radius: f32, rings: u32, segments: u32) {
        self.sphere_two_colour(centre, colour, colour, radius, rings, segments);
    }

    /// Latitude/longitude sphere with the polar caps and outermost rings in
    /// `cap_colour` and the body in `colour`.
    pub fn sphere_two_colour(
        &mut self,
        centre: Vec3,
        cap_colour: Vec3,
        colour: Vec3,
        radius: f32,
        rings: u32,
        segments: u32,
    ) {
        let base = self.idx;
        let s = segments;
        let r = rings.max(2);

        // North pole, latitude circles, south pole.
        self.push_vertex(centre + Vec3::Z * radius, Vec3::Z, cap_colour);
        for lat in 1..r {
            let theta = std::f32::consts::PI * lat as f32 / r as f32;
            let ring_col = if lat == 1 || lat == r - 1 { cap_colour } else { colour };
            for lon in 0..s {
                let phi = std::f32::consts::TAU * lon as f32 / s as f32;
                let dir = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                );
                self.push_vertex(centre + dir * radius, dir, ring_col);
            }
        }
        self.push_vertex(centre - Vec3::Z * radius, -Vec3::Z, cap_colour);

        let first_ring = base + 1;
        let south = first_ring + (r - 1) * s;
        for lon in 0..s {
            let k = (lon + 1) % s;
            self.push_triangle(base, first_ring + lon, first_ring + k);
        }
        for lat in 0..r.saturating_sub(2) {
            let ring_a = first_ring + lat * s;
            let ring_b = ring_a + s;
            for lon in 0..s {
                let k = (lon + 1) % s;
                self.push_triangle(ring_a + lon, ring_b + lon, ring_b + k);
                self.push_triangle(ring_a + lon, ring_b + k, ring_a + k);
            }
        }
        let last_ring = first_ring + (r - 2) * s;
        for lon in 0..s {
            let k = (lon + 1) % s;
            self.push_triangle(south, last_ring + k, last_ring + lon);
        }
    }

    /// Appends a geodesic sphere built by `iterations` midpoint
    /// subdivisions of an icosahedron, sharing vertices between faces.
    ///
    /// Face count is `20 * 4^iterations`; vertex count is
    /// `10 * 4^iterations + 2`. Returns `(vertices, faces)` emitted.
    pub fn geodesic_sphere(
        &mut self,
        centre: Vec3,
        colour: Vec3,
        radius: f32,
        iterations: u32,
    ) -> (u32, u32) {
        let (vertices, faces) = geodesic_topology(iterations);
        let base = self.idx;
        for dir in &vertices {
            self.push_vertex(centre + *dir * radius, *dir, colour);
        }
        for face in &faces {
            self.push_triangle(base + face[0], base + face[1], base + face[2]);
        }
        (vertices.len() as u32, faces.len() as u32)
    }

    /// Geodesic sphere with three unique vertices per face so that each
    /// face takes its own colour from `face_colours` (cycled if shorter
    /// than the face count). Returns `(vertices, faces)` emitted.
    pub fn geodesic_sphere_faces(
        &mut self,
        centre: Vec3,
        face_colours: &[Vec3],
        radius: f32,
        iterations: u32,
    ) -> (u32, u32) {
        let (vertices, faces) = geodesic_topology(iterations);
        for (f, face) in faces.iter().enumerate() {
            let colour = if face_colours.is_empty() {
                Vec3::ONE
            } else {
                face_colours[f % face_colours.len()]
            };
            let base = self.idx;
            for &vi in face {
                let dir = vertices[vi as usize];
                self.push_vertex(centre + dir * radius, dir, colour);
            }
            self.push_triangle(base, base + 1, base + 2);
        }
        ((faces.len() * 3) as u32, faces.len() as u32)
    }

    /// Appends an icosahedron with 20 flat faces, each coloured from
    /// `face_colours` (cycled).
    pub fn icosahedron(&mut self, centre: Vec3, radius: f32, face_colours: &[Vec3]) {
        let vertices = icosa_vertices().map(|v| v.normalize());
        for (f, face) in ICOSA_FACES.iter().enumerate() {
            let colour = if face_colours.is_empty() {
                Vec3::ONE
            } else {
                face_colours[f % face_colours.len()]
            };
            let (a, b, c) = (
                vertices[face[0] as usize],
                vertices[face[1] as usize],
                vertices[face[2] as usize],
            );
            let normal = (b - a).cross(c - a).normalize_or_zero();
            let base = self.idx;
            for p in [a, b, c] {
                self.push_vertex(centre + p * radius, normal, colour);
            }
            self.push_triangle(base, base + 1, base + 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodesic_iteration_zero_is_icosahedron() {
        let mut vb = VertexBuffers::new();
        let (nv, nf) = vb.geodesic_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 1.0, 0);
        assert_eq!(nv, 12);
        assert_eq!(nf, 20);
        let bb = vb.bounding_box().unwrap();
        let eps = 1e-5;
        // Unit radius: the box is symmetric and contained in [-1, 1]^3.
        assert!((bb.min + bb.max).length() < eps);
        assert!(bb.max.max_element() <= 1.0 + eps);
        assert!(bb.min.min_element() >= -1.0 - eps);
        vb.check().unwrap();
    }

    #[test]
    fn test_geodesic_face_counts() {
        for k in 0..3u32 {
            let mut vb = VertexBuffers::new();
            let (nv, nf) = vb.geodesic_sphere(Vec3::ZERO, Vec3::ONE, 1.0, k);
            assert_eq!(nf, 20 * 4_u32.pow(k));
            assert_eq!(nv, 10 * 4_u32.pow(k) + 2);
        }
    }

    #[test]
    fn test_geodesic_vertices_on_sphere() {
        let mut vb = VertexBuffers::new();
        vb.geodesic_sphere(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE, 2.0, 2);
        for i in 0..vb.vertex_count() {
            let r = (vb.position(i) - Vec3::new(1.0, 2.0, 3.0)).length();
            assert!((r - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_geodesic_per_face_triples_vertices() {
        let mut vb = VertexBuffers::new();
        let (nv, nf) = vb.geodesic_sphere_faces(Vec3::ZERO, &[Vec3::X, Vec3::Y], 1.0, 1);
        assert_eq!(nf, 80);
        assert_eq!(nv, 3 * nf);
        assert_eq!(vb.vertex_count(), nv);
        vb.check().unwrap();
    }

    #[test]
    fn test_latlon_sphere_counts() {
        let (rings, segments) = (8u32, 12u32);
        let mut vb = VertexBuffers::new();
        vb.sphere(Vec3::ZERO, Vec3::ONE, 1.0, rings, segments);
        assert_eq!(vb.vertex_count(), (rings - 1) * segments + 2);
        assert_eq!(vb.indices.len() as u32, 6 * segments * (rings - 1));
        vb.check().unwrap();
    }

    #[test]
    fn test_icosahedron_counts() {
        let mut vb = VertexBuffers::new();
        vb.icosahedron(Vec3::ZERO, 1.0, &[Vec3::X]);
        assert_eq!(vb.vertex_count(), 60);
        assert_eq!(vb.indices.len(), 60);
        vb.check().unwrap();
    }
}
