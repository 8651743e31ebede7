//! A gaze-oriented eyeball model.

use glam::Vec3;

use crate::model::{ModelCommon, VisualModel};
use crate::primitives::orthonormal_pair;

/// An eyeball: white sphere, coloured iris ring and black pupil disc,
/// oriented along a gaze direction.
pub struct EyeVisual {
    /// Shared model state.
    pub common: ModelCommon,
    /// Eyeball radius.
    pub radius: f32,
    /// Unit gaze direction.
    pub gaze: Vec3,
    /// Iris colour.
    pub iris_colour: Vec3,
}

impl EyeVisual {
    /// An eye at a world offset, looking along `gaze`.
    #[must_use]
    pub fn new(offset: Vec3, radius: f32, gaze: Vec3) -> Self {
        Self {
            common: ModelCommon::new("eye", offset),
            radius,
            gaze: gaze.normalize_or_zero(),
            iris_colour: Vec3::new(0.25, 0.45, 0.65),
        }
    }
}

impl VisualModel for EyeVisual {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {
        let white = Vec3::ONE;
        let r = self.radius;
        let gaze = self.gaze;
        let (ux, uy) = orthonormal_pair(gaze);
        let vb = &mut self.common.buffers;

        vb.geodesic_sphere(Vec3::ZERO, white, r, 3);
        // Iris annulus just off the sphere surface, facing the gaze.
        vb.circle_outline(
            gaze * r * 1.001,
            gaze,
            ux,
            self.iris_colour,
            r * 0.33,
            r * 0.18,
            24,
        );
        // Pupil disc inside the iris.
        vb.disc(gaze * r * 1.002, ux, uy, Vec3::ZERO, r * 0.22, 24);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_counts() {
        let mut eye = EyeVisual::new(Vec3::ZERO, 1.0, Vec3::Z);
        eye.finalize().unwrap();
        let sphere = 10 * 4_u32.pow(3) + 2;
        let iris = 2 * 24;
        let pupil = 1 + 24;
        assert_eq!(eye.common.buffers.vertex_count(), sphere + iris + pupil);
        eye.common.buffers.check().unwrap();
    }

    #[test]
    fn test_pupil_sits_along_gaze() {
        let gaze = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mut eye = EyeVisual::new(Vec3::ZERO, 2.0, gaze);
        eye.finalize().unwrap();
        // The pupil fan centre is the last disc's first vertex.
        let sphere = 10 * 4_u32.pow(3) + 2;
        let iris = 2 * 24;
        let pupil_centre = eye.common.buffers.position(sphere + iris);
        assert!((pupil_centre - gaze * 2.0 * 1.002).length() < 1e-4);
    }
}
