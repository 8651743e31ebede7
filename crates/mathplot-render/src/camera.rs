//! Projection and scene-view composition.
//!
//! The scene has no free-flying camera: all non-two-dimensional models are
//! transformed by a single composed scene-view matrix. During a drag the
//! view is `translation delta * rotation-about-centre * saved view`, where
//! the saved view was captured at mouse press.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// The projection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionKind {
    /// Perspective projection from field of view and clip planes.
    #[default]
    Perspective,
    /// Orthographic projection from two corner points and clip planes.
    Orthographic,
    /// Cylindrical projection; the shader maps world vertices onto a
    /// virtual cylinder around a camera point.
    Cylindrical,
}

impl ProjectionKind {
    /// The next kind in the Ctrl+Y cycle.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            ProjectionKind::Perspective => ProjectionKind::Orthographic,
            ProjectionKind::Orthographic => ProjectionKind::Cylindrical,
            ProjectionKind::Cylindrical => ProjectionKind::Perspective,
        }
    }
}

/// Projection parameters for all three kinds.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Active kind.
    pub kind: ProjectionKind,
    /// Field of view in degrees (perspective).
    pub fov_deg: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Orthographic left-bottom corner.
    pub ortho_lb: Vec2,
    /// Orthographic right-top corner.
    pub ortho_rt: Vec2,
    /// Cylindrical camera position (world).
    pub cyl_cam_pos: Vec3,
    /// Cylindrical screen radius.
    pub cyl_radius: f32,
    /// Cylindrical screen height.
    pub cyl_height: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Perspective,
            fov_deg: 30.0,
            near: 0.001,
            far: 300.0,
            ortho_lb: Vec2::new(-1.3, -1.0),
            ortho_rt: Vec2::new(1.3, 1.0),
            cyl_cam_pos: Vec3::ZERO,
            cyl_radius: 0.005,
            cyl_height: 0.01,
        }
    }
}

impl Projection {
    /// The projection matrix for the given aspect ratio. Cylindrical
    /// projection is identity here; the shader does the pixel-to-world-ray
    /// mapping from the uniforms instead.
    #[must_use]
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        match self.kind {
            ProjectionKind::Perspective => {
                Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, self.near, self.far)
            }
            ProjectionKind::Orthographic => Mat4::orthographic_rh(
                self.ortho_lb.x,
                self.ortho_rt.x,
                self.ortho_lb.y,
                self.ortho_rt.y,
                self.near,
                self.far,
            ),
            ProjectionKind::Cylindrical => Mat4::IDENTITY,
        }
    }

    /// Sets the field of view, clamped to (1, 179) degrees.
    pub fn set_fov(&mut self, fov_deg: f32) {
        self.fov_deg = fov_deg.clamp(1.0, 179.0);
    }

    /// Scales the orthographic corners symmetrically about their centre
    /// (zoom).
    pub fn zoom_ortho(&mut self, factor: f32) {
        let centre = (self.ortho_lb + self.ortho_rt) * 0.5;
        self.ortho_lb = centre + (self.ortho_lb - centre) * factor;
        self.ortho_rt = centre + (self.ortho_rt - centre) * factor;
    }
}

/// Inverse-projects a point given in normalized device coordinates at the
/// view-space depth `view_z`, returning the view-space position.
#[must_use]
pub fn unproject(proj: Mat4, ndc_xy: Vec2, view_z: f32) -> Vec3 {
    // Find the NDC depth of the requested view-space z.
    let clip = proj * Vec4::new(0.0, 0.0, view_z, 1.0);
    let ndc_z = if clip.w.abs() > f32::EPSILON {
        clip.z / clip.w
    } else {
        0.0
    };
    let inv = proj.inverse();
    let p = inv * Vec4::new(ndc_xy.x, ndc_xy.y, ndc_z, 1.0);
    if p.w.abs() > f32::EPSILON {
        p.truncate() / p.w
    } else {
        p.truncate()
    }
}

/// The composed scene view applied to all non-two-dimensional models.
#[derive(Debug, Clone)]
pub struct SceneView {
    /// Translation the view resets to.
    pub default_translation: Vec3,
    /// Rotation the view resets to.
    pub default_rotation: Quat,
    /// View captured at mouse press; deltas compose against this.
    pub saved: Mat4,
    /// Translation accumulated during the current drag or scroll.
    pub translation_delta: Vec3,
    /// Rotation accumulated during the current drag.
    pub rotation_delta: Quat,
    /// Point (view space) the rotation delta pivots about.
    pub rotation_centre: Vec3,
    /// Distance from the view axis to the rotation centre's model.
    pub rotation_centre_distance: f32,
    current: Mat4,
}

impl Default for SceneView {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY)
    }
}

impl SceneView {
    /// A scene view with the given defaults, starting at the default pose.
    #[must_use]
    pub fn new(default_translation: Vec3, default_rotation: Quat) -> Self {
        let mut view = Self {
            default_translation,
            default_rotation,
            saved: Mat4::IDENTITY,
            translation_delta: Vec3::ZERO,
            rotation_delta: Quat::IDENTITY,
            rotation_centre: Vec3::ZERO,
            rotation_centre_distance: 0.0,
            current: Mat4::IDENTITY,
        };
        view.reset();
        view
    }

    /// Resets to the default translation and rotation and clears deltas.
    pub fn reset(&mut self) {
        self.current = Mat4::from_translation(self.default_translation)
            * Mat4::from_quat(self.default_rotation);
        self.saved = self.current;
        self.clear_deltas();
    }

    /// Captures the current view as the base for a new drag.
    pub fn snapshot(&mut self) {
        self.saved = self.current;
        self.clear_deltas();
    }

    /// Clears the drag deltas.
    pub fn clear_deltas(&mut self) {
        self.translation_delta = Vec3::ZERO;
        self.rotation_delta = Quat::IDENTITY;
    }

    /// Recomposes and returns the current view from the saved view and the
    /// deltas, rotating about the rotation centre.
    pub fn compose(&mut self) -> Mat4 {
        let about_centre = Mat4::from_translation(self.rotation_centre)
            * Mat4::from_quat(self.rotation_delta)
            * Mat4::from_translation(-self.rotation_centre);
        self.current =
            Mat4::from_translation(self.translation_delta) * about_centre * self.saved;
        self.current
    }

    /// The current composed view matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.current
    }

    /// The translation-only version of the current view, used for
    /// two-dimensional models that must not tilt with the scene.
    #[must_use]
    pub fn translation_only(&self) -> Mat4 {
        Mat4::from_translation(self.translation())
    }

    /// The current view translation.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.current.w_axis.truncate()
    }

    /// The current view rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_mat4(&self.current)
    }

    /// Overwrites the current view from a translation and rotation.
    pub fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.current = Mat4::from_translation(translation) * Mat4::from_quat(rotation);
        self.saved = self.current;
        self.clear_deltas();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_defaults() {
        let mut view = SceneView::new(Vec3::new(0.0, 0.0, -7.0), Quat::from_rotation_y(0.4));
        view.translation_delta = Vec3::ONE;
        view.rotation_delta = Quat::from_rotation_x(1.0);
        view.compose();
        view.reset();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -7.0))
            * Mat4::from_quat(Quat::from_rotation_y(0.4));
        assert!(view.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_snapshot_then_identity_deltas_is_noop() {
        let mut view = SceneView::default();
        let before = view.matrix();
        view.snapshot();
        view.compose();
        assert!(view.matrix().abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn test_rotation_about_centre_fixes_centre() {
        let mut view = SceneView::default();
        view.snapshot();
        view.rotation_centre = Vec3::new(0.0, 0.0, -5.0);
        view.rotation_delta = Quat::from_rotation_y(1.0);
        let m = view.compose();
        // The centre, expressed in the saved frame, maps to itself.
        let centre_world = view.saved.inverse() * Vec4::new(0.0, 0.0, -5.0, 1.0);
        let mapped = m * centre_world;
        assert!((mapped.truncate() - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_translation_only_strips_rotation() {
        let mut view = SceneView::new(Vec3::new(1.0, 2.0, -3.0), Quat::from_rotation_x(0.7));
        view.compose();
        let t = view.translation_only();
        assert!(t.x_axis.abs_diff_eq(Vec4::X, 1e-6));
        assert!((t.w_axis.truncate() - view.translation()).length() < 1e-6);
    }

    #[test]
    fn test_perspective_unproject_depth() {
        let proj = Projection::default();
        let m = proj.matrix(1.0);
        let p = unproject(m, Vec2::ZERO, -5.0);
        assert!((p.z + 5.0).abs() < 1e-3);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
    }

    #[test]
    fn test_fov_clamping() {
        let mut proj = Projection::default();
        proj.set_fov(0.0);
        assert!((proj.fov_deg - 1.0).abs() < f32::EPSILON);
        proj.set_fov(200.0);
        assert!((proj.fov_deg - 179.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ortho_zoom_is_symmetric() {
        let mut proj = Projection {
            kind: ProjectionKind::Orthographic,
            ..Projection::default()
        };
        let centre = (proj.ortho_lb + proj.ortho_rt) * 0.5;
        proj.zoom_ortho(2.0);
        let centre2 = (proj.ortho_lb + proj.ortho_rt) * 0.5;
        assert!((centre - centre2).length() < 1e-6);
    }

    #[test]
    fn test_projection_cycle() {
        assert_eq!(ProjectionKind::Perspective.cycled(), ProjectionKind::Orthographic);
        assert_eq!(ProjectionKind::Cylindrical.cycled(), ProjectionKind::Perspective);
    }
}
