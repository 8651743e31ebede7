//! Neighbour-mesh post-processing and ray/triangle queries.
//!
//! A [`NeighbourMesh`] is derived from a model's triangle soup (the flat
//! position/normal sequences plus the index stream). Coincident vertex
//! positions are collapsed onto a single index so that adjacency queries are
//! well-defined: the result carries the unified vertex set, the mapping back
//! to the original indices, the undirected edge set and an oriented triangle
//! list whose rotational sense agrees with the shading normals. The oriented
//! triangles support picking a surface point from a world-space ray.

use glam::Vec3;

/// A triangle of the unified mesh, with a consistent geometric normal.
#[derive(Debug, Clone, Copy)]
pub struct MeshTriangle {
    /// Unified vertex indices, wound so the geometric normal agrees with the
    /// averaged shading normal at the corners.
    pub indices: [u32; 3],
    /// Unit geometric normal.
    pub normal: Vec3,
}

/// Result of a ray/triangle crossing query.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// World-space intersection point.
    pub point: Vec3,
    /// Unified indices of the triangle that was hit.
    pub indices: [u32; 3],
    /// The triangle's geometric normal.
    pub normal: Vec3,
}

/// A deduplicated, edge- and triangle-indexed view of a triangle soup.
#[derive(Debug, Clone, Default)]
pub struct NeighbourMesh {
    /// Unified vertex positions.
    pub vp: Vec<Vec3>,
    /// For each unified vertex, the original vertex indices that folded into
    /// it.
    pub vp_to_orig: Vec<Vec<u32>>,
    /// Undirected edges between unified vertices, each stored `(a, b)` with
    /// `a < b`, sorted.
    pub edges: Vec<(u32, u32)>,
    /// Oriented triangles.
    pub triangles: Vec<MeshTriangle>,
}

impl NeighbourMesh {
    /// Builds a neighbour mesh with exact position matching.
    ///
    /// `positions` and `normals` are the model's flat stride-3 sequences and
    /// `indices` its triangle index stream.
    #[must_use]
    pub fn new(positions: &[f32], normals: &[f32], indices: &[u32]) -> Self {
        Self::with_threshold(positions, normals, indices, 0.0)
    }

    /// Builds a neighbour mesh, collapsing vertices whose positions are
    /// within `vlen_thresh` of each other.
    #[must_use]
    pub fn with_threshold(
        positions: &[f32],
        normals: &[f32],
        indices: &[u32],
        vlen_thresh: f32,
    ) -> Self {
        let n = positions.len() / 3;
        let pos = |i: usize| Vec3::new(positions[3 * i], positions[3 * i + 1], positions[3 * i + 2]);
        let nrm = |i: usize| Vec3::new(normals[3 * i], normals[3 * i + 1], normals[3 * i + 2]);

        // Group coincident vertices. Each group is the sorted set of original
        // indices within the threshold of index i; duplicate groups collapse.
        let mut groups: Vec<Vec<u32>> = Vec::new();
        let mut equiv_top: Vec<u32> = vec![u32::MAX; n];
        for i in 0..n {
            if equiv_top[i] != u32::MAX {
                continue;
            }
            let pi = pos(i);
            let mut group: Vec<u32> = Vec::new();
            for (j, slot) in equiv_top.iter().enumerate() {
                if *slot == u32::MAX && (pos(j) - pi).length() <= vlen_thresh {
                    group.push(j as u32);
                }
            }
            let new_index = groups.len() as u32;
            for &j in &group {
                equiv_top[j as usize] = new_index;
            }
            groups.push(group);
        }

        let vp: Vec<Vec3> = groups.iter().map(|g| pos(g[0] as usize)).collect();

        // Edges and oriented triangles from the index stream.
        let mut edges: Vec<(u32, u32)> = Vec::new();
        let mut triangles: Vec<MeshTriangle> = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3) {
            let (oa, ob, oc) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (a, b, c) = (equiv_top[oa], equiv_top[ob], equiv_top[oc]);
            for &(p, q) in &[(a, b), (b, c), (c, a)] {
                if p != q {
                    edges.push((p.min(q), p.max(q)));
                }
            }

            let (va, vb, vc) = (vp[a as usize], vp[b as usize], vp[c as usize]);
            let mut normal = (vb - va).cross(vc - va).normalize_or_zero();
            let shading = (nrm(oa) + nrm(ob) + nrm(oc)).normalize_or_zero();
            let mut corners = [a, b, c];
            if normal.dot(shading) < 0.0 {
                corners.swap(1, 2);
                normal = -normal;
            }
            triangles.push(MeshTriangle {
                indices: corners,
                normal,
            });
        }
        edges.sort_unstable();
        edges.dedup();

        Self {
            vp,
            vp_to_orig: groups,
            edges,
            triangles,
        }
    }

    /// Casts the segment `coord → coord + vdir` at the mesh and returns the
    /// first triangle crossed.
    ///
    /// The ray origin is displaced by `vdir / 2` before testing, so a short
    /// segment centred near the surface still registers a crossing.
    #[must_use]
    pub fn find_triangle_crossing(&self, coord: Vec3, vdir: Vec3) -> Option<TriangleHit> {
        let origin = coord + vdir * 0.5;
        for tri in &self.triangles {
            let [a, b, c] = tri.indices;
            let hit = ray_tri_intersection(
                origin,
                vdir,
                self.vp[a as usize],
                self.vp[b as usize],
                self.vp[c as usize],
            );
            if let Some(point) = hit {
                return Some(TriangleHit {
                    point,
                    indices: tri.indices,
                    normal: tri.normal,
                });
            }
        }
        None
    }

    /// Convenience crossing query aiming the ray from `coord` toward
    /// `target` (typically a model's bounding-box centre).
    #[must_use]
    pub fn find_triangle_crossing_toward(&self, coord: Vec3, target: Vec3) -> Option<TriangleHit> {
        self.find_triangle_crossing(coord, target - coord)
    }
}

/// Möller–Trumbore segment/triangle intersection.
///
/// Returns the intersection point of the segment `origin → origin + dir`
/// with triangle `(v0, v1, v2)`, or `None` when the segment misses or is
/// parallel to the triangle plane.
#[must_use]
pub fn ray_tri_intersection(
    origin: Vec3,
    dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<Vec3> {
    const EPS: f32 = 1e-7;
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let pvec = dir.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(e1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(qvec) * inv_det;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(origin + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles forming the unit square in the z = 0 plane, with the
    /// shared diagonal vertices duplicated (as a primitive generator would
    /// emit them).
    fn unit_square_soup() -> (Vec<f32>, Vec<f32>, Vec<u32>) {
        #[rustfmt::skip]
        let positions = vec![
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            1.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
            1.0, 1.0, 0.0,
            0.0, 1.0, 0.0,
        ];
        let normals = vec![0.0, 0.0, 1.0].repeat(6);
        let indices = vec![0, 1, 2, 3, 4, 5];
        (positions, normals, indices)
    }

    #[test]
    fn test_dedup_collapses_coincident_vertices() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        assert_eq!(mesh.vp.len(), 4);
        // The two corners shared by both triangles fold two originals each.
        let folded: usize = mesh.vp_to_orig.iter().map(Vec::len).sum();
        assert_eq!(folded, 6);
    }

    #[test]
    fn test_edges_ascending_and_unique() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        // Square outline plus one diagonal.
        assert_eq!(mesh.edges.len(), 5);
        for &(a, b) in &mesh.edges {
            assert!(a < b);
        }
        let mut sorted = mesh.edges.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), mesh.edges.len());
    }

    #[test]
    fn test_triangle_orientation_matches_shading_normal() {
        let (p, mut n, i) = unit_square_soup();
        // Flip the winding of the second triangle's shading normals: the
        // post-processor must re-orient so normal · shading >= 0.
        for v in n.iter_mut().skip(9) {
            *v = -*v;
        }
        let mesh = NeighbourMesh::new(&p, &n, &i);
        for tri in &mesh.triangles {
            let [a, b, c] = tri.indices;
            let shading: Vec3 = {
                // All original normals at these corners, averaged.
                let orig: Vec<u32> = [a, b, c]
                    .iter()
                    .flat_map(|&u| mesh.vp_to_orig[u as usize].clone())
                    .collect();
                orig.iter()
                    .map(|&o| Vec3::new(n[3 * o as usize], n[3 * o as usize + 1], n[3 * o as usize + 2]))
                    .sum()
            };
            if shading.length() > 0.0 {
                assert!(tri.normal.dot(shading.normalize()) >= 0.0);
            }
        }
    }

    #[test]
    fn test_triangle_areas_positive() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        for tri in &mesh.triangles {
            let [a, b, c] = tri.indices;
            let area = (mesh.vp[b as usize] - mesh.vp[a as usize])
                .cross(mesh.vp[c as usize] - mesh.vp[a as usize])
                .length()
                * 0.5;
            assert!(area > 0.0);
        }
    }

    #[test]
    fn test_flat_surface_picking() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        let hit = mesh
            .find_triangle_crossing(Vec3::new(0.3, 0.4, 5.0), Vec3::new(0.0, 0.0, -10.0))
            .expect("ray should cross the surface");
        assert!((hit.point - Vec3::new(0.3, 0.4, 0.0)).length() < 1e-5);
        // The hit triangle's 2-D extent contains the query point.
        let xs: Vec<f32> = hit.indices.iter().map(|&k| mesh.vp[k as usize].x).collect();
        let ys: Vec<f32> = hit.indices.iter().map(|&k| mesh.vp[k as usize].y).collect();
        let (xmin, xmax) = (xs.iter().copied().fold(f32::MAX, f32::min), xs.iter().copied().fold(f32::MIN, f32::max));
        let (ymin, ymax) = (ys.iter().copied().fold(f32::MAX, f32::min), ys.iter().copied().fold(f32::MIN, f32::max));
        assert!((xmin..=xmax).contains(&0.3));
        assert!((ymin..=ymax).contains(&0.4));
    }

    #[test]
    fn test_miss_returns_none() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        let hit = mesh.find_triangle_crossing(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -10.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_crossing_toward_target() {
        let (p, n, i) = unit_square_soup();
        let mesh = NeighbourMesh::new(&p, &n, &i);
        let hit = mesh
            .find_triangle_crossing_toward(Vec3::new(0.5, 0.5, 3.0), Vec3::new(0.5, 0.5, -3.0))
            .expect("centre-aimed ray should cross");
        assert!((hit.point - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-5);
    }
}
