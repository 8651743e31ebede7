//! Text models: one textured quad per glyph.
//!
//! A text model's local origin is at the baseline of the first glyph. Its
//! view and scene matrices are independent of any parent model, so a label
//! can stay facing the camera while its parent rotates.

use glam::{Mat4, Vec2, Vec3};

use mathplot_render::{GlyphQuad, GlyphSource, TextRenderData};

/// A string rendered as per-glyph textured quads.
pub struct VisualTextModel {
    /// The text (UTF-8; codepoints outside the glyph source are skipped).
    pub text: String,
    /// Glyph height in world units.
    pub font_size: f32,
    /// Raster resolution in pixels.
    pub font_res: u32,
    /// Foreground colour.
    pub colour: Vec3,
    /// World placement of the text's local frame.
    pub view_matrix: Mat4,
    /// Scene view assigned each frame.
    pub scene_matrix: Mat4,
    /// Laid-out glyph quads.
    pub quads: Vec<GlyphQuad>,
    /// Total advance width of the string in world units.
    pub width: f32,
    /// Tallest glyph height in world units.
    pub height: f32,
    /// GPU resources, created on first render.
    pub render_data: Option<TextRenderData>,
}

impl VisualTextModel {
    /// A text model at the origin; call [`VisualTextModel::layout`] before
    /// rendering.
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: f32, font_res: u32, colour: Vec3) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_res,
            colour,
            view_matrix: Mat4::IDENTITY,
            scene_matrix: Mat4::IDENTITY,
            quads: Vec::new(),
            width: 0.0,
            height: 0.0,
            render_data: None,
        }
    }

    /// Moves the text's local frame to a world offset.
    pub fn set_offset(&mut self, offset: Vec3) {
        self.view_matrix = Mat4::from_translation(offset);
    }

    /// Builds one quad per glyph along the baseline.
    ///
    /// With `centre_horizontal` the left edge shifts by half the string
    /// width so the origin is the string's horizontal centre.
    pub fn layout(&mut self, source: &dyn GlyphSource, centre_horizontal: bool) {
        self.quads.clear();
        self.width = 0.0;
        self.height = 0.0;
        // World units per raster pixel; the builtin face's height stands in
        // for the em square.
        let scale = self.font_size / self.font_res as f32;
        let mut pen = 0.0f32;
        for c in self.text.chars() {
            let Some(glyph) = source.glyph(c, self.font_res) else {
                pen += self.font_size * 0.5;
                continue;
            };
            let m = glyph.metrics;
            let x0 = pen + m.bearing.x * scale;
            let x1 = x0 + m.size.x * scale;
            let y1 = m.bearing.y * scale;
            let y0 = y1 - m.size.y * scale;
            self.quads.push(GlyphQuad {
                corners: [
                    Vec3::new(x0, y0, 0.0),
                    Vec3::new(x1, y0, 0.0),
                    Vec3::new(x1, y1, 0.0),
                    Vec3::new(x0, y1, 0.0),
                ],
                uv: [
                    Vec2::new(0.0, 1.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(0.0, 0.0),
                ],
                glyph: c,
            });
            self.height = self.height.max(m.size.y * scale);
            pen += m.advance * scale;
        }
        self.width = pen;
        if centre_horizontal {
            let shift = self.width * 0.5;
            for quad in &mut self.quads {
                for corner in &mut quad.corners {
                    corner.x -= shift;
                }
            }
        }
        self.render_data = None;
    }
}
