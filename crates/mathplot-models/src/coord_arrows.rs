//! The coordinate-arrow model: three axis arrows about a centre sphere.

use glam::Vec3;

use mathplot_render::GlyphSource;

use crate::model::{ModelCommon, VisualModel};
use crate::text::VisualTextModel;

/// RGB axis arrows with a centre sphere and optional axis labels.
pub struct CoordArrows {
    /// Shared model state.
    pub common: ModelCommon,
    /// Arrow length per axis.
    pub lengths: Vec3,
    /// Shaft radius as a proportion of the shortest arrow.
    pub thickness: f32,
    /// Label height in world units.
    pub em: f32,
    /// Centre sphere colour; chosen to contrast the scene background.
    pub centre_colour: Vec3,
    /// X axis colour.
    pub x_colour: Vec3,
    /// Y axis colour.
    pub y_colour: Vec3,
    /// Z axis colour.
    pub z_colour: Vec3,
}

impl CoordArrows {
    /// Coordinate arrows at a world offset.
    #[must_use]
    pub fn new(offset: Vec3, lengths: Vec3) -> Self {
        Self {
            common: ModelCommon::new("coordarrows", offset),
            lengths,
            thickness: 1.0 / 40.0,
            em: 0.0,
            centre_colour: Vec3::ZERO,
            x_colour: Vec3::new(1.0, 0.0, 0.0),
            y_colour: Vec3::new(0.0, 1.0, 0.0),
            z_colour: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Picks a centre sphere colour that contrasts with the background.
    pub fn set_colour_for_background(&mut self, bg: Vec3) {
        let luminance = 0.299 * bg.x + 0.587 * bg.y + 0.114 * bg.z;
        self.centre_colour = if luminance > 0.5 { Vec3::ZERO } else { Vec3::ONE };
    }

    /// Attaches "x", "y", "z" labels just past each arrow tip.
    pub fn add_axis_labels(&mut self, source: &dyn GlyphSource) {
        let em = if self.em > 0.0 {
            self.em
        } else {
            self.lengths.max_element() * 0.15
        };
        let offsets = [
            Vec3::X * self.lengths.x * 1.1,
            Vec3::Y * self.lengths.y * 1.1,
            Vec3::Z * self.lengths.z * 1.1,
        ];
        for (label, offset) in ["x", "y", "z"].iter().zip(offsets) {
            let mut text = VisualTextModel::new(*label, em, 24, self.centre_colour);
            text.layout(source, true);
            text.set_offset(self.common.offset() + offset);
            self.common.texts.push(text);
        }
    }
}

impl VisualModel for CoordArrows {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {
        let radius = self.lengths.min_element() * self.thickness;
        let vb = &mut self.common.buffers;
        vb.geodesic_sphere(Vec3::ZERO, self.centre_colour, radius * 2.0, 2);
        vb.arrow(
            Vec3::ZERO,
            Vec3::X * self.lengths.x,
            self.x_colour,
            radius,
            radius * 2.0,
            0.2,
            12,
        );
        vb.arrow(
            Vec3::ZERO,
            Vec3::Y * self.lengths.y,
            self.y_colour,
            radius,
            radius * 2.0,
            0.2,
            12,
        );
        vb.arrow(
            Vec3::ZERO,
            Vec3::Z * self.lengths.z,
            self.z_colour,
            radius,
            radius * 2.0,
            0.2,
            12,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathplot_render::BuiltinFont;

    #[test]
    fn test_finalize_builds_sphere_and_three_arrows() {
        let mut arrows = CoordArrows::new(Vec3::ZERO, Vec3::ONE);
        arrows.finalize().unwrap();
        // Geodesic sphere at 2 iterations plus three arrows (tube + cone,
        // 12 segments each).
        let sphere_verts = 10 * 4_u32.pow(2) + 2;
        let arrow_verts = (4 * 12 + 2) + (3 * 12 + 2);
        assert_eq!(
            arrows.common.buffers.vertex_count(),
            sphere_verts + 3 * arrow_verts
        );
        arrows.common.buffers.check().unwrap();
    }

    #[test]
    fn test_background_contrast() {
        let mut arrows = CoordArrows::new(Vec3::ZERO, Vec3::ONE);
        arrows.set_colour_for_background(Vec3::ONE);
        assert_eq!(arrows.centre_colour, Vec3::ZERO);
        arrows.set_colour_for_background(Vec3::ZERO);
        assert_eq!(arrows.centre_colour, Vec3::ONE);
    }

    #[test]
    fn test_axis_labels_attach_three_texts() {
        let mut arrows = CoordArrows::new(Vec3::ZERO, Vec3::ONE);
        arrows.add_axis_labels(&BuiltinFont);
        assert_eq!(arrows.common.texts.len(), 3);
        assert_eq!(arrows.common.texts[0].quads.len(), 1);
    }
}
