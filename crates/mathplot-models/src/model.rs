//! The visual-model abstraction.
//!
//! A model owns its CPU vertex/index arrays, a world-placement matrix, an
//! axis-aligned bounding box, child text models and (after first render)
//! GPU buffer handles. Concrete model kinds implement
//! [`VisualModel::init_vertices`] to populate the buffers from their data;
//! everything else about the lifecycle is shared.

use glam::{Mat4, Vec3};

use mathplot_core::{MathplotError, NeighbourMesh, Result, TriangleHit};
use mathplot_render::ModelRenderData;

use crate::text::VisualTextModel;
use crate::{BoundingBox, VertexBuffers};

/// State shared by every model kind.
pub struct ModelCommon {
    /// Model name, used in logs and exports.
    pub name: String,
    /// The CPU vertex/index arrays.
    pub buffers: VertexBuffers,
    /// Secondary buffer set holding the bounding-box wireframe.
    pub bb_buffers: VertexBuffers,
    /// The model's world placement; the only per-model transform.
    pub view_matrix: Mat4,
    /// Scene view assigned by the scene each frame.
    pub scene_matrix: Mat4,
    /// Model-wide opacity in `[0, 1]`.
    pub alpha: f32,
    /// Skip this model during rendering.
    pub hide: bool,
    /// Give this model the translation-only scene view (no tilt).
    pub two_dimensional: bool,
    /// Draw the bounding-box wireframe.
    pub show_bb: bool,
    /// Recompute the bounding box on (re)initialization.
    pub compute_bb: bool,
    /// GPU buffers must be (re)created before the next draw.
    pub post_vertex_init_required: bool,
    /// Only the colour buffer needs re-uploading.
    pub colours_dirty: bool,
    /// The axis-aligned bounding box of the vertex positions.
    pub bb: BoundingBox,
    /// Owned child text models.
    pub texts: Vec<VisualTextModel>,
    /// GPU buffers for the main vertex set.
    pub render_data: Option<ModelRenderData>,
    /// GPU buffers for the bounding-box wireframe.
    pub bb_render_data: Option<ModelRenderData>,
}

impl ModelCommon {
    /// A model placed at the given world offset.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            buffers: VertexBuffers::new(),
            bb_buffers: VertexBuffers::new(),
            view_matrix: Mat4::from_translation(offset),
            scene_matrix: Mat4::IDENTITY,
            alpha: 1.0,
            hide: false,
            two_dimensional: false,
            show_bb: false,
            compute_bb: true,
            post_vertex_init_required: false,
            colours_dirty: false,
            bb: BoundingBox::default(),
            texts: Vec::new(),
            render_data: None,
            bb_render_data: None,
        }
    }

    /// The model's world offset (view matrix translation column).
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.view_matrix.w_axis.truncate()
    }

    /// Moves the model to a new world offset.
    pub fn set_offset(&mut self, offset: Vec3) {
        self.view_matrix.w_axis = offset.extend(1.0);
    }

    /// Rebuilds the bounding-box wireframe into the secondary buffer set.
    ///
    /// Each box edge is one degenerate triangle whose vertices all sit on
    /// box corners; the wireframe pipeline rasterizes triangle edges as
    /// lines.
    pub fn build_bb_wireframe(&mut self, colour: Vec3) {
        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        self.bb_buffers.clear();
        let corners = self.bb.corners();
        for &(a, b) in &EDGES {
            let base = self.bb_buffers.idx;
            self.bb_buffers.push_vertex(corners[a], Vec3::Z, colour);
            self.bb_buffers.push_vertex(corners[b], Vec3::Z, colour);
            self.bb_buffers.push_triangle(base, base + 1, base);
        }
        self.bb_render_data = None;
    }
}

/// A renderable model: shared state plus one vertex-generation method.
pub trait VisualModel {
    /// Shared model state.
    fn common(&self) -> &ModelCommon;

    /// Shared model state, mutably.
    fn common_mut(&mut self) -> &mut ModelCommon;

    /// Populates the CPU buffers from this model's data. Called by
    /// [`VisualModel::finalize`] and again on every reinit.
    fn init_vertices(&mut self);

    /// Model name.
    fn name(&self) -> &str {
        &self.common().name
    }

    /// Runs vertex initialization, derives the bounding box and marks the
    /// GPU buffers for creation on first render. Call exactly once after
    /// construction.
    fn finalize(&mut self) -> Result<()> {
        self.init_vertices();
        self.update_bb()?;
        let common = self.common_mut();
        common.buffers.check()?;
        common.post_vertex_init_required = true;
        Ok(())
    }

    /// Regenerates all CPU content from current data and marks the GPU
    /// buffers for re-upload. Child text models are preserved.
    fn reinit(&mut self) -> Result<()> {
        {
            let common = self.common_mut();
            common.buffers.clear();
            common.bb_buffers.clear();
        }
        self.init_vertices();
        self.update_bb()?;
        let common = self.common_mut();
        common.buffers.check()?;
        common.post_vertex_init_required = true;
        Ok(())
    }

    /// As [`VisualModel::reinit`], but child text models are cleared too.
    fn reinit_with_clear_texts(&mut self) -> Result<()> {
        self.common_mut().texts.clear();
        self.reinit()
    }

    /// Clears CPU buffers, text models and GPU uploads.
    fn clear(&mut self) {
        let common = self.common_mut();
        common.buffers.clear();
        common.bb_buffers.clear();
        common.texts.clear();
        common.render_data = None;
        common.bb_render_data = None;
        common.colours_dirty = false;
    }

    /// Marks only the colour buffer for re-upload. Valid only while the
    /// colour array size is unchanged; positions and topology are left
    /// untouched.
    fn reinit_colour_buffer(&mut self) -> Result<()> {
        let common = self.common_mut();
        if common.buffers.colors.len() != common.buffers.positions.len() {
            return Err(MathplotError::BufferSizeMismatch {
                positions: common.buffers.positions.len(),
                normals: common.buffers.normals.len(),
                colors: common.buffers.colors.len(),
            });
        }
        common.colours_dirty = true;
        Ok(())
    }

    /// Recomputes the bounding box from the vertex positions.
    fn update_bb(&mut self) -> Result<()> {
        let common = self.common_mut();
        if !common.compute_bb || common.buffers.is_empty() {
            return Ok(());
        }
        common.bb = common.buffers.bounding_box()?;
        Ok(())
    }

    /// Attaches a child text model.
    fn add_text(&mut self, text: VisualTextModel) {
        self.common_mut().texts.push(text);
    }

    /// Derives the neighbour mesh of the current triangle soup.
    fn neighbour_mesh(&self) -> NeighbourMesh {
        let buffers = &self.common().buffers;
        NeighbourMesh::new(&buffers.positions, &buffers.normals, &buffers.indices)
    }

    /// Picks a surface point: casts a ray from `coord` (model space)
    /// toward the bounding-box centre and returns the first triangle hit.
    fn pick_towards_centre(&self, coord: Vec3) -> Option<TriangleHit> {
        self.neighbour_mesh()
            .find_triangle_crossing_toward(coord, self.common().bb.mid())
    }
}

/// A model with no vertex generator; the caller injects vertices directly
/// into its buffers. Useful for ad-hoc geometry and in tests.
pub struct RawModel {
    /// Shared model state.
    pub common: ModelCommon,
}

impl RawModel {
    /// An empty model at the given offset.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: Vec3) -> Self {
        Self {
            common: ModelCommon::new(name, offset),
        }
    }
}

impl VisualModel for RawModel {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_vertex_bounding_box() {
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
    fn test_finalize_computes_bb_and_flags_upload() {
        let mut model = RawModel::new("tube", Vec3::ZERO);
        model
            .common
            .buffers
            .tube(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::X, 0.1, 8);
        model.finalize().unwrap();
        assert!(model.common.post_vertex_init_required);
        for i in 0..model.common.buffers.idx {
            assert!(model.common.bb.contains(model.common.buffers.position(i)));
        }
    }

    #[test]
    fn test_bb_wireframe_vertices_on_corners() {
        let mut model = RawModel::new("box", Vec3::ZERO);
        model.common.buffers.cuboid(Vec3::ZERO, Vec3::ONE, Vec3::ONE);
        model.finalize().unwrap();
        model.common.build_bb_wireframe(Vec3::ZERO);
        let corners = model.common.bb.corners();
        let wf = &model.common.bb_buffers;
        assert_eq!(wf.indices.len() % 3, 0);
        for tri in wf.indices.chunks_exact(3) {
            for &i in tri {
                let p = wf.position(i);
                assert!(
                    corners.iter().any(|c| (*c - p).length() < 1e-6),
                    "wireframe vertex {p:?} not on a box corner"
                );
            }
        }
    }

    #[test]
    fn test_reinit_colour_buffer_requires_matching_size() {
        let mut model = RawModel::new("m", Vec3::ZERO);
        model.common.buffers.tube(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::X, 0.1, 6);
        model.finalize().unwrap();
        assert!(model.reinit_colour_buffer().is_ok());
        model.common.buffers.colors.pop();
        assert!(model.reinit_colour_buffer().is_err());
    }

    #[test]
    fn test_clear_drops_texts_and_buffers() {
        let mut model = RawModel::new("m", Vec3::ZERO);
        model.common.buffers.push_vertex(Vec3::ONE, Vec3::Z, Vec3::ONE);
        model.clear();
        assert!(model.common.buffers.is_empty());
        assert!(model.common.texts.is_empty());
    }
}
