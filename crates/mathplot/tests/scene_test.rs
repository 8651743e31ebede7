//! Scene-level behaviour: rotation centre selection, view persistence and
//! the bounding-box debug dump.

use mathplot::{
    Quat, RawModel, SavedView, Vec3, Visual, VisualModel, SAVED_VIEW_PATH,
};

fn boxed_cuboid(name: &str, offset: Vec3) -> Box<RawModel> {
    let mut model = RawModel::new(name, offset);
    model.common.buffers.cuboid(Vec3::ZERO, Vec3::ONE, Vec3::ONE);
    model.finalize().unwrap();
    Box::new(model)
}

#[test]
fn test_rotation_centre_picks_model_nearest_view_axis() {
    let mut visual = Visual::new("scene", 640, 480);
    // Pin the pose so a persisted view file cannot perturb the test.
    visual.scene_view.set_pose(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY);
    visual.add_model(boxed_cuboid("on-axis", Vec3::ZERO));
    visual.add_model(boxed_cuboid("off-axis", Vec3::new(2.0, 0.0, 0.0)));
    visual.scene_view.snapshot();
    visual.find_rotation_centre();
    // The on-axis model's midpoint maps to (0, 0, z) in view space.
    let centre = visual.scene_view.rotation_centre;
    assert!(centre.x.abs() < 1e-5 && centre.y.abs() < 1e-5);
    assert!(centre.z < 0.0);
    assert!(visual.scene_view.rotation_centre_distance < 1e-5);
}

#[test]
fn test_rotation_centre_skips_hidden_and_2d_models() {
    let mut visual = Visual::new("scene", 640, 480);
    // Pin the pose so a persisted view file cannot perturb the test.
    visual.scene_view.set_pose(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY);
    let mut hidden = boxed_cuboid("hidden", Vec3::ZERO);
    hidden.common.hide = true;
    visual.add_model(hidden);
    let mut flat = boxed_cuboid("flat", Vec3::new(0.1, 0.0, 0.0));
    flat.common.two_dimensional = true;
    visual.add_model(flat);
    visual.add_model(boxed_cuboid("pickable", Vec3::new(1.0, 0.0, 0.0)));
    visual.scene_view.snapshot();
    visual.find_rotation_centre();
    // Only the third model qualifies; its view-space x is 1.
    assert!((visual.scene_view.rotation_centre.x - 1.0).abs() < 1e-5);
}

#[test]
fn test_rotate_about_scene_origin_uses_saved_translation() {
    let mut visual = Visual::new("scene", 640, 480);
    // Pin the pose so a persisted view file cannot perturb the test.
    visual.scene_view.set_pose(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY);
    visual.add_model(boxed_cuboid("m", Vec3::new(3.0, 0.0, 0.0)));
    visual.options.rotate_about_scene_origin = true;
    visual.scene_view.snapshot();
    visual.find_rotation_centre();
    let expected = visual.scene_view.saved.w_axis.truncate();
    assert!((visual.scene_view.rotation_centre - expected).length() < 1e-6);
}

#[test]
fn test_saved_view_round_trip() {
    let mut visual = Visual::new("persist", 640, 480);
    let translation = Vec3::new(0.25, -0.5, -8.0);
    let rotation = Quat::from_rotation_y(0.35).normalize();
    visual.scene_view.set_pose(translation, rotation);
    visual.save_view().unwrap();

    // A fresh scene picks up the persisted defaults.
    let reloaded = Visual::new("persist2", 640, 480);
    assert!((reloaded.scene_view.default_translation - translation).length() < 1e-5);
    let q = reloaded.scene_view.default_rotation;
    assert!(
        (q.w - rotation.w).abs() < 1e-5
            && (q.x - rotation.x).abs() < 1e-5
            && (q.y - rotation.y).abs() < 1e-5
            && (q.z - rotation.z).abs() < 1e-5
    );

    // And the raw record matches to JSON precision.
    let record = SavedView::load(SAVED_VIEW_PATH).unwrap();
    assert!((record.translation_or(Vec3::ZERO) - translation).length() < 1e-5);
    std::fs::remove_file(SAVED_VIEW_PATH).ok();
}

#[test]
fn test_bounding_box_dump_structure() {
    let mut visual = Visual::new("dump", 640, 480);
    visual.add_model(boxed_cuboid("a", Vec3::ZERO));
    visual.add_model(boxed_cuboid("b", Vec3::new(1.0, 0.0, 0.0)));
    visual.scene_view.snapshot();
    let path = std::env::temp_dir().join("mathplot_bb_dump_test.json");
    visual.dump_bounding_boxes(path.to_str().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    // Two corner entries per model.
    assert_eq!(json["n"], serde_json::json!(4));
    for key in ["b1", "b2", "b3", "b4"] {
        assert_eq!(json[key].as_array().unwrap().len(), 3);
    }
    std::fs::remove_file(path).ok();
}

#[test]
fn test_models_keep_insertion_order() {
    let mut visual = Visual::new("order", 640, 480);
    let first = visual.add_model(boxed_cuboid("first", Vec3::ZERO));
    let second = visual.add_model(boxed_cuboid("second", Vec3::X));
    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert_eq!(visual.model(0).unwrap().name(), "first");
    assert_eq!(visual.model(1).unwrap().name(), "second");
}

/// Requires a GPU adapter; run manually with:
/// cargo test test_snapshot_dimensions -- --ignored
#[test]
#[ignore]
fn test_snapshot_dimensions() {
    let mut visual = Visual::new("snap", 640, 480);
    visual.add_model(boxed_cuboid("m", Vec3::ZERO));
    let mut engine =
        pollster::block_on(mathplot::RenderEngine::new_headless(640, 480)).unwrap();
    let path = std::env::temp_dir().join("mathplot_snapshot_it.png");
    let dims = visual
        .snapshot(&mut engine, path.to_str().unwrap(), false)
        .unwrap();
    assert_eq!(dims, (640, 480));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    std::fs::remove_file(path).ok();
}

#[test]
fn test_gltf_export_writes_parseable_file() {
    let mut visual = Visual::new("export", 640, 480);
    let mut model = RawModel::new("sphere", Vec3::new(1.0, 2.0, 3.0));
    model
        .common
        .buffers
        .geodesic_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 1.0, 1);
    model.finalize().unwrap();
    visual.add_model(Box::new(model));

    let path = std::env::temp_dir().join("mathplot_export_test.gltf");
    mathplot::export_gltf(&visual, path.to_str().unwrap()).unwrap();
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["meshes"].as_array().unwrap().len(), 1);
    assert_eq!(doc["nodes"][0]["translation"], serde_json::json!([1.0, 2.0, 3.0]));
    std::fs::remove_file(path).ok();
}
