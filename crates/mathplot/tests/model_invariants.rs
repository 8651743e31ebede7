//! Buffer and primitive invariants, checked through the public facade.

use mathplot::{RawModel, Vec3, VisualModel};
use proptest::prelude::*;

/// Structural invariants every model must satisfy after buffer mutation:
/// parallel attribute arrays, triangle-multiple indices in range, cursor
/// equal to vertex count, bounding box enclosing every vertex.
fn assert_invariants(model: &RawModel) {
    let vb = &model.common.buffers;
    vb.check().expect("buffer invariants");
    assert_eq!(vb.positions.len(), vb.normals.len());
    assert_eq!(vb.positions.len(), vb.colors.len());
    assert_eq!(vb.positions.len() % 3, 0);
    assert_eq!(vb.indices.len() % 3, 0);
    assert_eq!(vb.idx as usize, vb.positions.len() / 3);
    for i in 0..vb.idx {
        assert!(model.common.bb.contains(vb.position(i)));
    }
}

#[test]
fn test_geodesic_sphere_scenario() {
    // Radius 1, colour blue, zero iterations: an icosahedron.
    let mut model = RawModel::new("sphere", Vec3::ZERO);
    let (nv, nf) = model
        .common
        .buffers
        .geodesic_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 1.0, 0);
    model.finalize().unwrap();
    assert_eq!(nv, 12);
    assert_eq!(nf, 20);
    assert_eq!(model.common.buffers.indices.len(), 60);
    let bb = model.common.bb;
    assert!((bb.min + bb.max).length() < 1e-5);
    assert!(bb.max.max_element() <= 1.0 + 1e-5);
    assert_invariants(&model);
}

#[test]
fn test_single_vertex_bounding_box_scenario() {
    let mut model = RawModel::new("point", Vec3::ZERO);
    model
        .common
        .buffers
        .push_vertex(Vec3::new(5.0, 0.0, 0.0), Vec3::Z, Vec3::ONE);
    model.common.buffers.push_triangle(0, 0, 0);
    model.update_bb().unwrap();
    assert_eq!(model.common.bb.min, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(model.common.bb.max, Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn test_primitive_accumulation_keeps_invariants() {
    let mut model = RawModel::new("combo", Vec3::ZERO);
    let vb = &mut model.common.buffers;
    vb.tube(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y, 0.1, 12);
    vb.cone(Vec3::Z, Vec3::Z * 1.5, 0.0, Vec3::X, 0.2, 12);
    vb.sphere(Vec3::new(1.0, 0.0, 0.0), Vec3::Y, 0.3, 6, 8);
    vb.ring(Vec3::new(-1.0, 0.0, 0.0), Vec3::Z, 0.5, 0.1, 16);
    vb.flat_line(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE, 0.05);
    model.finalize().unwrap();
    assert_invariants(&model);
}

#[test]
fn test_picking_flat_surface_scenario() {
    // A 2-D surface of triangles at z = 0 over [0,1]^2.
    let mut model = RawModel::new("surface", Vec3::ZERO);
    let vb = &mut model.common.buffers;
    vb.flat_quad(
        [
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::Y,
        ],
        Vec3::ONE,
    );
    model.finalize().unwrap();

    let mesh = model.neighbour_mesh();
    let hit = mesh
        .find_triangle_crossing(Vec3::new(0.3, 0.4, 5.0), Vec3::new(0.0, 0.0, -10.0))
        .expect("ray must hit the surface");
    assert!((hit.point - Vec3::new(0.3, 0.4, 0.0)).length() < 1e-5);

    // The returned triangle's 2-D bounding box contains the query point.
    let xs: Vec<f32> = hit.indices.iter().map(|&i| mesh.vp[i as usize].x).collect();
    let ys: Vec<f32> = hit.indices.iter().map(|&i| mesh.vp[i as usize].y).collect();
    let xmin = xs.iter().copied().fold(f32::MAX, f32::min);
    let xmax = xs.iter().copied().fold(f32::MIN, f32::max);
    let ymin = ys.iter().copied().fold(f32::MAX, f32::min);
    let ymax = ys.iter().copied().fold(f32::MIN, f32::max);
    assert!((xmin..=xmax).contains(&0.3));
    assert!((ymin..=ymax).contains(&0.4));
}

#[test]
fn test_neighbour_mesh_edge_ordering() {
    let mut model = RawModel::new("m", Vec3::ZERO);
    model
        .common
        .buffers
        .geodesic_sphere(Vec3::ZERO, Vec3::ONE, 1.0, 1);
    model.finalize().unwrap();
    let mesh = model.neighbour_mesh();
    for &(a, b) in &mesh.edges {
        assert!(a < b);
    }
    for tri in &mesh.triangles {
        // Orientation law: geometric normal agrees with shading normals,
        // which for a sphere point outward.
        let centroid: Vec3 = tri
            .indices
            .iter()
            .map(|&i| mesh.vp[i as usize])
            .sum::<Vec3>()
            / 3.0;
        assert!(tri.normal.dot(centroid.normalize()) > 0.0);
    }
}

proptest! {
    #[test]
    fn prop_tube_counts(segments in 3u32..32, radius in 0.01f32..2.0, len in 0.1f32..5.0) {
        let mut model = RawModel::new("tube", Vec3::ZERO);
        model
            .common
            .buffers
            .tube(Vec3::ZERO, Vec3::Z * len, Vec3::X, Vec3::Y, radius, segments);
        model.finalize().unwrap();
        prop_assert_eq!(model.common.buffers.vertex_count(), 4 * segments + 2);
        prop_assert_eq!(model.common.buffers.indices.len() as u32, 12 * segments);
        assert_invariants(&model);
    }

    #[test]
    fn prop_geodesic_face_law(iterations in 0u32..4) {
        let mut model = RawModel::new("geo", Vec3::ZERO);
        let (nv, nf) = model
            .common
            .buffers
            .geodesic_sphere(Vec3::ZERO, Vec3::ONE, 1.0, iterations);
        model.finalize().unwrap();
        prop_assert_eq!(nf, 20 * 4_u32.pow(iterations));
        prop_assert_eq!(nv, 10 * 4_u32.pow(iterations) + 2);
        assert_invariants(&model);
    }
}
