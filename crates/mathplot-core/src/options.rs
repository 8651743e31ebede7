//! Scene configuration options.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Global configuration options for a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneOptions {
    /// Whether the coordinate arrows are rendered.
    pub show_coord_arrows: bool,

    /// Pin the coordinate arrows to a fixed 2-D screen corner instead of
    /// letting them follow the scene rotation.
    pub coord_arrows_in_screen: bool,

    /// Whether the title text is rendered.
    pub show_title: bool,

    /// Whether `render()` swaps buffers itself.
    pub render_swaps_buffers: bool,

    /// Rotate about the scene origin instead of the nearest model's
    /// bounding-box centre.
    pub rotate_about_scene_origin: bool,

    /// Rotate about the vertical axis instead of the classic free tilt.
    pub rotate_about_vertical: bool,

    /// Ignore all camera-moving input.
    pub scene_locked: bool,

    /// Keep the window open when the close button is pressed.
    pub prevent_window_close: bool,

    /// Show every model's bounding-box wireframe.
    pub show_bounding_boxes: bool,

    /// Dump visible models' bounding boxes to a debug JSON file each time a
    /// rotation centre is chosen.
    pub dump_bounding_boxes: bool,

    /// Background colour.
    pub bg_colour: Vec3,

    /// Light colour.
    pub light_colour: Vec3,

    /// Ambient light intensity.
    pub ambient_intensity: f32,

    /// Diffuse light position (world).
    pub diffuse_position: Vec3,

    /// Diffuse light intensity.
    pub diffuse_intensity: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_coord_arrows: false,
            coord_arrows_in_screen: false,
            show_title: false,
            render_swaps_buffers: true,
            rotate_about_scene_origin: false,
            rotate_about_vertical: false,
            scene_locked: false,
            prevent_window_close: false,
            show_bounding_boxes: false,
            dump_bounding_boxes: false,
            bg_colour: Vec3::new(1.0, 1.0, 1.0),
            light_colour: Vec3::ONE,
            ambient_intensity: 1.0,
            diffuse_position: Vec3::new(5.0, 5.0, 15.0),
            diffuse_intensity: 0.0,
        }
    }
}
