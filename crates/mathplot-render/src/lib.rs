//! Rendering backend for mathplot.
//!
//! This crate provides the wgpu-based rendering engine:
//! - GPU context lifecycle and graphics-program switching
//! - The projection, cylindrical and text pipelines (WGSL)
//! - Per-model and per-text GPU buffer management
//! - Projection and scene-view matrix composition
//! - Glyph sources and PNG snapshots

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod camera;
pub mod engine;
pub mod error;
pub mod glyphs;
pub mod model_render;
pub mod screenshot;
pub mod shader;
pub mod text_render;
pub mod uniforms;

pub use buffer::{create_index_buffer, create_uniform_buffer, create_vertex_buffer, update_buffer};
pub use camera::{unproject, Projection, ProjectionKind, SceneView};
pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
pub use glyphs::{BuiltinFont, GlyphBitmap, GlyphMetrics, GlyphSource};
pub use model_render::ModelRenderData;
pub use screenshot::{reverse_rows, save_png, SnapshotOptions};
pub use shader::{create_graphics_pipeline, create_text_pipeline, PipelineLayouts, ProgramKind};
pub use text_render::{FontManager, GlyphQuad, TextRenderData};
pub use uniforms::{FrameUniforms, ModelUniforms, TextUniforms};
