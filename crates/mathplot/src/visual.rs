//! The scene owner.
//!
//! A [`Visual`] owns an ordered sequence of models, the projection and
//! scene-view state, the light parameters and the interaction state. Models
//! render strictly in insertion order; two-dimensional models get the
//! translation-only scene view so they never tilt.

use glam::{Mat4, Quat, Vec2, Vec3};

use mathplot_core::{Result, SavedView, SceneOptions, SAVED_VIEW_PATH};
use mathplot_models::{CoordArrows, VisualModel, VisualTextModel};
use mathplot_render::{
    save_png, unproject, FrameUniforms, ModelRenderData, ModelUniforms, Projection,
    ProjectionKind, ProgramKind, RenderEngine, SceneView, SnapshotOptions, TextRenderData,
    TextUniforms,
};

/// Where the bounding-box debug JSON is written.
pub const BB_DEBUG_PATH: &str = "/tmp/mathplot_bounding_boxes.json";

/// The interactive scene: models, view state and input state.
pub struct Visual {
    /// Window title; also seeds snapshot and export file names.
    pub title: String,
    /// Window width in pixels.
    pub window_w: u32,
    /// Window height in pixels.
    pub window_h: u32,
    /// Device pixel ratio reported by the window adapter.
    pub pixel_ratio: f32,
    /// Scene options.
    pub options: SceneOptions,
    /// Projection parameters.
    pub projection: Projection,
    /// The composed scene view.
    pub scene_view: SceneView,
    /// Owned models, rendered in insertion order.
    pub(crate) models: Vec<Box<dyn VisualModel>>,
    /// The coordinate-arrow model.
    pub coord_arrows: CoordArrows,
    /// Optional title text.
    pub title_text: Option<VisualTextModel>,
    /// Scene-owned label texts.
    pub labels: Vec<VisualTextModel>,

    // Input state machine bits.
    pub(crate) mouse_press_position: Vec2,
    pub(crate) cursor_position: Vec2,
    pub(crate) rotate_mode: bool,
    pub(crate) translate_mode: bool,
    pub(crate) rotate_mod_mode: bool,
    pub(crate) scrolling: bool,
    /// Cleared by Ctrl+V; set by hosts that pause updates.
    pub paused: bool,
    pub(crate) ready_to_finish: bool,
    /// Index of the model selected with F1..F10.
    pub selected_model: usize,
    /// Cylindrical camera position captured at mouse press.
    pub(crate) cyl_cam_saved: Vec3,
    /// Snapshot requested by Ctrl+S, taken on the next redraw.
    pub(crate) pending_snapshot: Option<String>,
    pub(crate) snapshot_counter: u32,
}

impl Visual {
    /// A scene with the given title and window size. If `/tmp/Visual.json`
    /// exists, its translation and rotation pre-populate the default view.
    #[must_use]
    pub fn new(title: impl Into<String>, window_w: u32, window_h: u32) -> Self {
        let mut default_translation = Vec3::new(0.0, 0.0, -5.0);
        let mut default_rotation = Quat::IDENTITY;
        if let Some(saved) = SavedView::load(SAVED_VIEW_PATH) {
            default_translation = saved.translation_or(default_translation);
            default_rotation = saved.rotation_or(default_rotation).normalize();
        }
        Self {
            title: title.into(),
            window_w,
            window_h,
            pixel_ratio: 1.0,
            options: SceneOptions::default(),
            projection: Projection::default(),
            scene_view: SceneView::new(default_translation, default_rotation),
            models: Vec::new(),
            coord_arrows: CoordArrows::new(Vec3::ZERO, Vec3::splat(0.25)),
            title_text: None,
            labels: Vec::new(),
            mouse_press_position: Vec2::ZERO,
            cursor_position: Vec2::ZERO,
            rotate_mode: false,
            translate_mode: false,
            rotate_mod_mode: false,
            scrolling: false,
            paused: false,
            ready_to_finish: false,
            selected_model: 0,
            cyl_cam_saved: Vec3::ZERO,
            pending_snapshot: None,
            snapshot_counter: 0,
        }
    }

    /// Takes ownership of a finalized model; returns its index. Models
    /// render in the order they were added.
    pub fn add_model(&mut self, model: Box<dyn VisualModel>) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// Number of owned models.
    #[must_use]
    pub fn num_models(&self) -> usize {
        self.models.len()
    }

    /// The model at `index`.
    #[must_use]
    pub fn model(&self, index: usize) -> Option<&dyn VisualModel> {
        self.models.get(index).map(AsRef::as_ref)
    }

    /// The model at `index`, mutably.
    pub fn model_mut(&mut self, index: usize) -> Option<&mut Box<dyn VisualModel>> {
        self.models.get_mut(index)
    }

    /// Adds a scene-owned label at a world position.
    pub fn add_label(&mut self, mut text: VisualTextModel, position: Vec3) {
        text.set_offset(position);
        self.labels.push(text);
    }

    /// Sets the title text model shown at the top of the window.
    pub fn set_title_text(&mut self, text: VisualTextModel) {
        self.title_text = Some(text);
        self.options.show_title = true;
    }

    /// Whether a quit has been signalled. Sticky; stop driving `render()`
    /// once set.
    #[must_use]
    pub fn ready_to_finish(&self) -> bool {
        self.ready_to_finish
    }

    /// Whether the last camera motion came from a scroll rather than a
    /// drag.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Signals a quit.
    pub fn signal_finish(&mut self) {
        self.ready_to_finish = true;
    }

    /// Resets the scene view to its default translation and rotation.
    pub fn reset_view(&mut self) {
        self.scene_view.reset();
    }

    /// Writes the scene translation and rotation to stdout and to
    /// `/tmp/Visual.json`.
    pub fn save_view(&self) -> Result<()> {
        let translation = self.scene_view.translation();
        let rotation = self.scene_view.rotation();
        println!("scenetrans: {translation}, scenerotn: {rotation}");
        SavedView::from_view(translation, rotation).save(SAVED_VIEW_PATH)
    }

    /// Chooses the rotation centre for the next drag.
    ///
    /// With `rotate_about_scene_origin` the centre is the saved view's
    /// translation point. Otherwise it is the view-space bounding-box
    /// midpoint of the visible non-two-dimensional model closest to the
    /// through-camera vertical line, skipping models behind the camera.
    pub fn find_rotation_centre(&mut self) {
        let saved = self.scene_view.saved;
        let fallback = saved.w_axis.truncate();
        if self.options.rotate_about_scene_origin {
            self.scene_view.rotation_centre = fallback;
            self.scene_view.rotation_centre_distance = 0.0;
            return;
        }
        let mut best: Option<(f32, Vec3)> = None;
        for model in &self.models {
            let common = model.common();
            if common.hide || common.two_dimensional || common.buffers.is_empty() {
                continue;
            }
            let mid = common.bb.mid();
            let mid_view = (saved * common.view_matrix * mid.extend(1.0)).truncate();
            if mid_view.z >= 0.0 {
                continue;
            }
            // Perpendicular distance from the through-camera line
            // (0,0,-100) -> (0,0,100).
            let dist = Vec2::new(mid_view.x, mid_view.y).length();
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, mid_view));
            }
        }
        match best {
            Some((dist, centre)) => {
                self.scene_view.rotation_centre = centre;
                self.scene_view.rotation_centre_distance = dist;
            }
            None => {
                self.scene_view.rotation_centre = fallback;
                self.scene_view.rotation_centre_distance = 0.0;
            }
        }
        if self.options.dump_bounding_boxes {
            if let Err(e) = self.dump_bounding_boxes(BB_DEBUG_PATH) {
                log::error!("could not write bounding-box debug JSON: {e}");
            }
        }
    }

    /// Writes each visible non-2-D model's bounding-box corners (view
    /// space, re-centred at the transformed midpoint) to a debug JSON
    /// file.
    pub fn dump_bounding_boxes(&self, path: &str) -> Result<()> {
        let saved = self.scene_view.saved;
        let mut object = serde_json::Map::new();
        let mut n = 0u32;
        for model in &self.models {
            let common = model.common();
            if common.hide || common.two_dimensional || common.buffers.is_empty() {
                continue;
            }
            let mid = common.bb.mid();
            let mid_view = (saved * common.view_matrix * mid.extend(1.0)).truncate();
            for corner in [common.bb.min, common.bb.max] {
                let recentred = corner - mid + mid_view;
                n += 1;
                object.insert(
                    format!("b{n}"),
                    serde_json::json!([recentred.x, recentred.y, recentred.z]),
                );
            }
        }
        object.insert("n".to_string(), serde_json::json!(n));
        let json = serde_json::to_string_pretty(&serde_json::Value::Object(object))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The scene view z used when unprojecting cursor positions.
    pub(crate) fn scene_z(&self) -> f32 {
        self.scene_view.translation().z
    }

    /// Maps a window pixel position to `[-1, 1]` coordinates (both axes
    /// scaled by the window width, as the drag maths expects).
    pub(crate) fn pixels_to_ndc(&self, p: Vec2) -> Vec2 {
        let w = self.window_w.max(1) as f32;
        let h = self.window_h.max(1) as f32;
        Vec2::new((2.0 * p.x - w) / w, -(2.0 * p.y - h) / w)
    }

    /// Unprojects a window pixel position at the current scene z.
    pub(crate) fn window_to_world(&self, p: Vec2) -> Vec3 {
        let aspect = self.window_w.max(1) as f32 / self.window_h.max(1) as f32;
        unproject(self.projection.matrix(aspect), self.pixels_to_ndc(p), self.scene_z())
    }

    /// A screen-corner anchor pose: inverse-projects the anchor at a fixed
    /// text-z plane in front of the camera.
    fn screen_anchor_pose(&self, anchor_ndc: Vec2) -> Mat4 {
        let aspect = self.window_w.max(1) as f32 / self.window_h.max(1) as f32;
        let text_z = -1.0;
        let at = unproject(self.projection.matrix(aspect), anchor_ndc, text_z);
        Mat4::from_translation(at)
    }

    /// Renders one frame to the engine's surface (or headless target).
    pub fn render(&mut self, engine: &mut RenderEngine) -> Result<()> {
        let kind = match self.projection.kind {
            ProjectionKind::Cylindrical => ProgramKind::Cylindrical,
            _ => ProgramKind::Projection,
        };
        engine.ensure_program(kind);

        let surface_texture = match &engine.surface {
            Some(surface) => match surface.get_current_texture() {
                Ok(t) => Some(t),
                Err(e) => {
                    log::error!("surface acquire failed: {e}");
                    return Ok(());
                }
            },
            None => None,
        };
        let view = match &surface_texture {
            Some(t) => t
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            None => engine
                .headless_view()
                .ok_or_else(|| mathplot_core::MathplotError::RenderError(
                    "no render target".to_string(),
                ))?,
        };

        self.render_scene_to(engine, &view);

        if let Some(t) = surface_texture {
            if self.options.render_swaps_buffers {
                t.present();
            }
        }
        Ok(())
    }

    /// Renders a snapshot of the scene to a PNG file; returns the
    /// dimensions written.
    pub fn snapshot(
        &mut self,
        engine: &mut RenderEngine,
        path: &str,
        transparent: bool,
    ) -> Result<(u32, u32)> {
        let target = engine.create_snapshot_target();
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        self.render_scene_to(engine, &view);
        let mut pixels = engine
            .read_back(&target)
            .map_err(|e| mathplot_core::MathplotError::RenderError(e.to_string()))?;
        if engine.readback_is_bgra() {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        let (w, h) = engine.dimensions();
        save_png(
            path,
            &pixels,
            w,
            h,
            SnapshotOptions {
                transparent_background: transparent,
                flip_rows: false,
            },
        )
        .map_err(|e| mathplot_core::MathplotError::RenderError(e.to_string()))
    }

    /// The per-frame sequence, rendered to an arbitrary colour target:
    /// frame uniforms, scene-view composition, model sync and the single
    /// render pass (models, wireframes, text).
    fn render_scene_to(&mut self, engine: &mut RenderEngine, target: &wgpu::TextureView) {
        let aspect = engine.width.max(1) as f32 / engine.height.max(1) as f32;
        let projection = self.projection.matrix(aspect);

        // Frame uniforms: projection, lights, cylindrical camera. The text
        // program reads the same block.
        let mut frame = FrameUniforms::default();
        frame.set_projection(projection);
        frame.set_lights(
            self.options.light_colour,
            self.options.ambient_intensity,
            self.options.diffuse_position,
            self.options.diffuse_intensity,
        );
        frame.cyl_cam_pos = self.projection.cyl_cam_pos.to_array();
        frame.cyl_radius = self.projection.cyl_radius;
        frame.cyl_height = self.projection.cyl_height;
        engine.write_frame_uniforms(&frame);

        // Compose the scene view for this frame.
        let sceneview = self.scene_view.compose();
        let sceneview_2d = self.scene_view.translation_only();

        // Coordinate arrows: contrast colour, pose, then treated as a
        // model.
        let show_arrows =
            self.options.show_coord_arrows && self.projection.kind != ProjectionKind::Cylindrical;
        if show_arrows {
            self.coord_arrows.set_colour_for_background(self.options.bg_colour);
            if self.coord_arrows.common.buffers.is_empty() {
                if let Err(e) = self.coord_arrows.finalize() {
                    log::error!("coord arrows init failed: {e}");
                }
            }
            self.coord_arrows.common.scene_matrix = if self.options.coord_arrows_in_screen {
                self.screen_anchor_pose(Vec2::new(-0.8, -0.8))
            } else {
                sceneview
            };
        }

        // Assign per-model scene matrices and sync GPU buffers.
        for model in &mut self.models {
            let common = model.common_mut();
            common.scene_matrix = if common.two_dimensional {
                sceneview_2d
            } else {
                sceneview
            };
        }
        let bg = self.options.bg_colour;
        let show_bb_all = self.options.show_bounding_boxes;
        {
            let RenderEngine {
                device,
                queue,
                layouts,
                fonts,
                ..
            } = engine;
            let mut sync_model = |m: &mut dyn VisualModel| {
                let common = m.common_mut();
                if common.buffers.is_empty() {
                    return;
                }
                if common.post_vertex_init_required || common.render_data.is_none() {
                    common.render_data = Some(ModelRenderData::new(
                        device,
                        &layouts.model,
                        &common.buffers.positions,
                        &common.buffers.normals,
                        &common.buffers.colors,
                        &common.buffers.indices,
                    ));
                    common.post_vertex_init_required = false;
                    common.colours_dirty = false;
                } else if common.colours_dirty {
                    if let Some(rd) = &common.render_data {
                        if let Err(e) = rd.update_colours(queue, &common.buffers.colors) {
                            log::error!("colour update failed: {e}");
                        }
                    }
                    common.colours_dirty = false;
                }
                if (common.show_bb || show_bb_all) && common.bb_render_data.is_none() {
                    if common.bb_buffers.is_empty() {
                        common.build_bb_wireframe(Vec3::ONE - bg);
                    }
                    common.bb_render_data = Some(ModelRenderData::new(
                        device,
                        &layouts.model,
                        &common.bb_buffers.positions,
                        &common.bb_buffers.normals,
                        &common.bb_buffers.colors,
                        &common.bb_buffers.indices,
                    ));
                }
                // Uniforms for this frame.
                let uniforms =
                    ModelUniforms::new(common.scene_matrix, common.view_matrix, common.alpha);
                if let Some(rd) = &common.render_data {
                    rd.write_uniforms(queue, &uniforms);
                }
                if let Some(rd) = &common.bb_render_data {
                    rd.write_uniforms(queue, &uniforms);
                }
                // Child texts follow the camera: translation-only view at
                // the parent's offset.
                let parent_offset = common.view_matrix.w_axis.truncate();
                let text_view = Mat4::from_translation(
                    (common.scene_matrix * parent_offset.extend(1.0)).truncate(),
                ) * Mat4::from_translation(-parent_offset);
                for text in &mut common.texts {
                    if text.render_data.is_none() && !text.quads.is_empty() {
                        text.render_data = Some(TextRenderData::new(
                            device,
                            queue,
                            &layouts.text,
                            &layouts.glyph,
                            fonts,
                            &text.quads,
                            text.font_res,
                        ));
                    }
                    text.scene_matrix = text_view;
                    if let Some(rd) = &text.render_data {
                        rd.write_uniforms(
                            queue,
                            &TextUniforms::new(text.scene_matrix, text.view_matrix, text.colour),
                        );
                    }
                }
            };
            for model in &mut self.models {
                sync_model(model.as_mut());
            }
            if show_arrows {
                sync_model(&mut self.coord_arrows);
            }
            // Scene labels and the title use the 2-D (translation-only or
            // fixed-anchor) views.
            let title_pose = self.screen_anchor_pose(Vec2::new(0.0, 0.85));
            let show_title = self.options.show_title;
            for (text, view_override) in self
                .labels
                .iter_mut()
                .map(|t| (t, sceneview_2d))
                .chain(
                    self.title_text
                        .iter_mut()
                        .filter(|_| show_title)
                        .map(|t| (t, title_pose)),
                )
            {
                if text.render_data.is_none() && !text.quads.is_empty() {
                    text.render_data = Some(TextRenderData::new(
                        device,
                        queue,
                        &layouts.text,
                        &layouts.glyph,
                        fonts,
                        &text.quads,
                        text.font_res,
                    ));
                }
                text.scene_matrix = view_override;
                if let Some(rd) = &text.render_data {
                    rd.write_uniforms(
                        queue,
                        &TextUniforms::new(text.scene_matrix, text.view_matrix, text.colour),
                    );
                }
            }
        }

        // The render pass: clear to the background colour, draw models in
        // insertion order, wireframes, then text.
        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(bg.x),
                            g: f64::from(bg.y),
                            b: f64::from(bg.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &engine.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&engine.graphics_pipeline);
            pass.set_bind_group(0, &engine.frame_bind_group, &[]);
            for model in &self.models {
                let common = model.common();
                if common.hide {
                    continue;
                }
                if let Some(rd) = &common.render_data {
                    rd.draw(&mut pass);
                }
            }
            if show_arrows {
                if let Some(rd) = &self.coord_arrows.common.render_data {
                    rd.draw(&mut pass);
                }
            }

            // Bounding-box wireframes in a second indexed draw per model.
            if let Some(wireframe) = &engine.wireframe_pipeline {
                pass.set_pipeline(wireframe);
                pass.set_bind_group(0, &engine.frame_bind_group, &[]);
                for model in &self.models {
                    let common = model.common();
                    if common.hide || !(common.show_bb || show_bb_all) {
                        continue;
                    }
                    if let Some(rd) = &common.bb_render_data {
                        rd.draw(&mut pass);
                    }
                }
            }

            // Text: model children, then scene labels and the title.
            pass.set_pipeline(&engine.text_pipeline);
            pass.set_bind_group(0, &engine.frame_bind_group, &[]);
            for model in &self.models {
                let common = model.common();
                if common.hide {
                    continue;
                }
                for text in &common.texts {
                    if let Some(rd) = &text.render_data {
                        rd.draw(&mut pass);
                    }
                }
            }
            if show_arrows {
                for text in &self.coord_arrows.common.texts {
                    if let Some(rd) = &text.render_data {
                        rd.draw(&mut pass);
                    }
                }
            }
            for text in self.labels.iter().chain(
                self.title_text
                    .iter()
                    .filter(|_| self.options.show_title),
            ) {
                if let Some(rd) = &text.render_data {
                    rd.draw(&mut pass);
                }
            }
        }
        engine.queue.submit(std::iter::once(encoder.finish()));
    }
}
