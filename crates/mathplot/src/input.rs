//! The input state machine.
//!
//! Window adapters feed pointer, scroll and key events into these
//! handlers; the handlers translate them into scene-view transforms, mode
//! toggles and one-shot actions (snapshot, export, view save).

use glam::{Quat, Vec2, Vec3};

use mathplot_core::{Action, Key, Modifiers, MouseButton};
use mathplot_render::ProjectionKind;

use crate::visual::Visual;

/// Gain applied to unprojected cursor displacement before it becomes a
/// rotation angle (in degrees per world unit).
const MOUSE_GAIN: f32 = 40.0;

/// Scroll-to-translation gain, proportional to rotation-centre distance.
const SCROLL_GAIN: f32 = 0.1;

impl Visual {
    /// Handles a mouse button press or release.
    pub fn on_mouse_button(&mut self, button: MouseButton, action: Action, mods: Modifiers) {
        if self.options.scene_locked {
            return;
        }
        match action {
            Action::Press => {
                self.mouse_press_position = self.cursor_position;
                self.scrolling = false;
                self.scene_view.snapshot();
                self.cyl_cam_saved = self.projection.cyl_cam_pos;
                self.find_rotation_centre();
                match button {
                    MouseButton::Left => {
                        self.rotate_mode = true;
                        self.rotate_mod_mode = mods.control;
                    }
                    MouseButton::Right => {
                        self.translate_mode = true;
                    }
                    MouseButton::Unhandled => {}
                }
            }
            Action::Release => {
                self.scene_view.snapshot();
                self.rotate_mode = false;
                self.translate_mode = false;
                self.rotate_mod_mode = false;
            }
            Action::Repeat => {}
        }
    }

    /// Handles cursor motion in window pixels.
    pub fn on_cursor_move(&mut self, x: f32, y: f32) {
        self.cursor_position = Vec2::new(x, y);
        if self.options.scene_locked || !(self.rotate_mode || self.translate_mode) {
            return;
        }

        let p0 = self.window_to_world(self.mouse_press_position);
        let p1 = self.window_to_world(self.cursor_position);
        let moved = (p1 - p0) * MOUSE_GAIN;

        if self.rotate_mode {
            self.scene_view.rotation_delta = if self.options.rotate_about_vertical {
                if self.rotate_mod_mode {
                    Quat::from_axis_angle(Vec3::Z, -(moved.x + moved.y).to_radians())
                } else {
                    Quat::from_axis_angle(Vec3::Y, -moved.x.to_radians())
                        * Quat::from_axis_angle(Vec3::X, -moved.y.to_radians())
                }
            } else if self.rotate_mod_mode {
                Quat::from_axis_angle(Vec3::Z, -(moved.x + moved.y).to_radians())
            } else {
                let axis = moved.normalize_or_zero();
                if axis.length_squared() > 0.0 {
                    Quat::from_axis_angle(axis, -moved.length().to_radians())
                } else {
                    Quat::IDENTITY
                }
            };
            self.scene_view.compose();
        }

        if self.translate_mode {
            let delta = Vec3::new(moved.x, moved.y, 0.0) / MOUSE_GAIN;
            self.scene_view.translation_delta = delta;
            self.projection.cyl_cam_pos = self.cyl_cam_saved - delta;
            self.scene_view.compose();
        }
    }

    /// Handles a scroll event.
    pub fn on_scroll(&mut self, dx: f32, dy: f32) {
        if self.options.scene_locked {
            return;
        }
        self.scene_view.snapshot();
        self.scrolling = true;
        self.find_rotation_centre();

        match self.projection.kind {
            ProjectionKind::Orthographic => {
                let factor = (1.0 - dy * 0.1).max(0.01);
                self.projection.zoom_ortho(factor);
            }
            ProjectionKind::Perspective | ProjectionKind::Cylindrical => {
                let centre = self.scene_view.rotation_centre;
                let reach = centre.length().max(self.projection.near);
                let mut dz = dy * SCROLL_GAIN * reach;
                // Never travel more than half the far-plane distance past
                // the rotation centre.
                let z = self.scene_view.translation().z;
                let limit = centre.z + self.projection.far * 0.5;
                if z + dz > limit {
                    dz = limit - z;
                }
                let lateral = dx * SCROLL_GAIN * reach;
                self.scene_view.translation_delta = Vec3::new(lateral, 0.0, dz);
                self.projection.cyl_cam_pos -= Vec3::new(lateral, 0.0, dz);
                self.scene_view.compose();
                self.scene_view.snapshot();
            }
        }
    }

    /// Handles a window resize in pixels.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.window_w = width;
        self.window_h = height;
    }

    /// Handles the window close button.
    pub fn on_close_request(&mut self) {
        if !self.options.prevent_window_close {
            self.ready_to_finish = true;
        }
    }

    /// Handles a key press, release or repeat.
    #[allow(clippy::too_many_lines)]
    pub fn on_key(&mut self, key: Key, action: Action, mods: Modifiers) {
        if action == Action::Release {
            return;
        }

        if mods.control {
            match key {
                Key::Q => self.ready_to_finish = true,
                Key::H => self.print_help(),
                Key::L => {
                    self.options.scene_locked = !self.options.scene_locked;
                    log::info!("scene lock: {}", self.options.scene_locked);
                }
                Key::V => self.paused = false,
                Key::S => {
                    let name = format!(
                        "{}_{:04}.png",
                        sanitize_filename(&self.title),
                        self.snapshot_counter
                    );
                    self.snapshot_counter += 1;
                    self.pending_snapshot = Some(name);
                }
                Key::M => {
                    let name = format!("{}.gltf", sanitize_filename(&self.title));
                    match crate::gltf::export_gltf(self, &name) {
                        Ok(()) => log::info!("scene exported to {name}"),
                        Err(e) => log::error!("glTF export failed: {e}"),
                    }
                }
                Key::A => self.reset_view(),
                Key::Z => {
                    if let Err(e) = self.save_view() {
                        log::error!("could not save view: {e}");
                    }
                }
                Key::O => self.projection.set_fov(self.projection.fov_deg - 2.0),
                Key::P => self.projection.set_fov(self.projection.fov_deg + 2.0),
                Key::U => self.projection.near *= 0.5,
                Key::I => self.projection.near *= 2.0,
                Key::LeftBracket => self.projection.far *= 0.5,
                Key::RightBracket => self.projection.far *= 2.0,
                Key::Y => self.projection.kind = self.projection.kind.cycled(),
                Key::K => {
                    self.options.rotate_about_scene_origin =
                        !self.options.rotate_about_scene_origin;
                }
                Key::B => {
                    self.options.rotate_about_vertical = !self.options.rotate_about_vertical;
                }
                Key::D => self.switch_up_axis(),
                Key::J => {
                    self.options.show_bounding_boxes = !self.options.show_bounding_boxes;
                    for model in &mut self.models {
                        model.common_mut().bb_render_data = None;
                        model.common_mut().bb_buffers.clear();
                    }
                }
                Key::Up => self.projection.cyl_height *= 2.0,
                Key::Down => self.projection.cyl_height *= 0.5,
                _ => {}
            }
            return;
        }

        if let Some(index) = key.function_index() {
            if index <= self.models.len() {
                if mods.shift {
                    let common = self.models[index - 1].common_mut();
                    common.hide = !common.hide;
                }
                self.selected_model = index - 1;
            }
            return;
        }

        if mods.shift {
            match key {
                Key::Left => self.nudge_selected_alpha(-0.1),
                Key::Right => self.nudge_selected_alpha(0.1),
                Key::Up => self.projection.cyl_radius *= 2.0,
                Key::Down => self.projection.cyl_radius *= 0.5,
                _ => {}
            }
        }
    }

    fn nudge_selected_alpha(&mut self, delta: f32) {
        if let Some(model) = self.models.get_mut(self.selected_model) {
            let common = model.common_mut();
            common.alpha = (common.alpha + delta).clamp(0.0, 1.0);
        }
    }

    /// Rotates the view a quarter turn about x, switching which axis reads
    /// as "up" (y or z).
    fn switch_up_axis(&mut self) {
        let rotation =
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2) * self.scene_view.rotation();
        self.scene_view.set_pose(self.scene_view.translation(), rotation);
    }

    fn print_help(&self) {
        println!("mathplot scene bindings:");
        println!("  Ctrl+Q           quit");
        println!("  Ctrl+H           this help");
        println!("  Ctrl+L           toggle scene lock");
        println!("  Ctrl+V           clear pause");
        println!("  Ctrl+S           save PNG snapshot");
        println!("  Ctrl+M           export scene as glTF");
        println!("  Ctrl+A           reset view");
        println!("  Ctrl+Z           print/save scene view");
        println!("  Ctrl+O/P         narrow/widen field of view");
        println!("  Ctrl+U/I         halve/double near clip");
        println!("  Ctrl+[/]         halve/double far clip");
        println!("  Ctrl+Y           cycle projection");
        println!("  Ctrl+K           rotate about origin vs nearest model");
        println!("  Ctrl+B           rotate about vertical vs free tilt");
        println!("  Ctrl+D           switch up axis (y/z)");
        println!("  Ctrl+J           toggle bounding boxes");
        println!("  F1..F10          select model (with Shift: toggle hide)");
        println!("  Shift+Left/Right selected model alpha -/+");
        println!("  Shift+Up/Down    double/halve cylindrical radius");
        println!("  Ctrl+Up/Down     double/halve cylindrical height");
    }
}

/// Conditions a title-derived filename: non-alphanumerics become
/// underscores.
fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "mathplot".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn press_release(visual: &mut Visual) {
        visual.on_mouse_button(MouseButton::Left, Action::Press, Modifiers::NONE);
        visual.on_mouse_button(MouseButton::Left, Action::Release, Modifiers::NONE);
    }

    #[test]
    fn test_press_without_motion_leaves_view_unchanged() {
        let mut visual = Visual::new("t", 640, 480);
        let before = visual.scene_view.matrix();
        press_release(&mut visual);
        assert!(visual.scene_view.matrix().abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn test_drag_rotates_view() {
        let mut visual = Visual::new("t", 640, 480);
        let before = visual.scene_view.matrix();
        visual.on_cursor_move(320.0, 240.0);
        visual.on_mouse_button(MouseButton::Left, Action::Press, Modifiers::NONE);
        visual.on_cursor_move(420.0, 240.0);
        assert!(!visual.scene_view.matrix().abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn test_scene_lock_blocks_drag() {
        let mut visual = Visual::new("t", 640, 480);
        visual.options.scene_locked = true;
        let before = visual.scene_view.matrix();
        visual.on_cursor_move(320.0, 240.0);
        visual.on_mouse_button(MouseButton::Left, Action::Press, Modifiers::NONE);
        visual.on_cursor_move(520.0, 300.0);
        assert!(visual.scene_view.matrix().abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn test_ctrl_a_resets_view() {
        let mut visual = Visual::new("t", 640, 480);
        let default = Mat4::from_translation(visual.scene_view.default_translation)
            * Mat4::from_quat(visual.scene_view.default_rotation);
        visual.on_cursor_move(320.0, 240.0);
        visual.on_mouse_button(MouseButton::Left, Action::Press, Modifiers::NONE);
        visual.on_cursor_move(420.0, 300.0);
        visual.on_mouse_button(MouseButton::Left, Action::Release, Modifiers::NONE);
        visual.on_key(Key::A, Action::Press, Modifiers::control());
        assert!(visual.scene_view.matrix().abs_diff_eq(default, 1e-5));
    }

    #[test]
    fn test_ctrl_q_signals_finish() {
        let mut visual = Visual::new("t", 640, 480);
        assert!(!visual.ready_to_finish());
        visual.on_key(Key::Q, Action::Press, Modifiers::control());
        assert!(visual.ready_to_finish());
    }

    #[test]
    fn test_close_request_respects_prevent_flag() {
        let mut visual = Visual::new("t", 640, 480);
        visual.options.prevent_window_close = true;
        visual.on_close_request();
        assert!(!visual.ready_to_finish());
        visual.options.prevent_window_close = false;
        visual.on_close_request();
        assert!(visual.ready_to_finish());
    }

    #[test]
    fn test_fov_bindings_clamp() {
        let mut visual = Visual::new("t", 640, 480);
        for _ in 0..200 {
            visual.on_key(Key::P, Action::Press, Modifiers::control());
        }
        assert!((visual.projection.fov_deg - 179.0).abs() < f32::EPSILON);
        for _ in 0..200 {
            visual.on_key(Key::O, Action::Press, Modifiers::control());
        }
        assert!((visual.projection.fov_deg - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_projection_cycle_binding() {
        let mut visual = Visual::new("t", 640, 480);
        assert_eq!(visual.projection.kind, ProjectionKind::Perspective);
        visual.on_key(Key::Y, Action::Press, Modifiers::control());
        assert_eq!(visual.projection.kind, ProjectionKind::Orthographic);
    }

    #[test]
    fn test_ortho_scroll_zooms_symmetrically() {
        let mut visual = Visual::new("t", 640, 480);
        visual.projection.kind = ProjectionKind::Orthographic;
        let before = visual.projection.ortho_rt.x - visual.projection.ortho_lb.x;
        visual.on_scroll(0.0, 1.0);
        let after = visual.projection.ortho_rt.x - visual.projection.ortho_lb.x;
        assert!(after < before);
    }

    #[test]
    fn test_cylindrical_radius_and_height_bindings() {
        let mut visual = Visual::new("t", 640, 480);
        let r = visual.projection.cyl_radius;
        let h = visual.projection.cyl_height;
        visual.on_key(Key::Up, Action::Press, Modifiers::shift());
        assert!((visual.projection.cyl_radius - 2.0 * r).abs() < 1e-9);
        visual.on_key(Key::Down, Action::Press, Modifiers::control());
        assert!((visual.projection.cyl_height - 0.5 * h).abs() < 1e-9);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my plot/1"), "my_plot_1");
        assert_eq!(sanitize_filename(""), "mathplot");
    }
}
