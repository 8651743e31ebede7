//! mathplot: real-time scientific plotting and 3-D visualization over
//! wgpu.
//!
//! A [`Visual`] scene owns an ordered set of models (surfaces, tubes,
//! arrows, text and the bundled model kinds), composes a mouse-driven
//! scene view over them each frame, and can export PNG snapshots and glTF
//! scenes. The winit adapter in [`app`] drives the render loop; data flows
//! from a model's raw scalars or vectors through its
//! [`DataModel`](mathplot_models::DataModel) scaling into per-vertex
//! colours and z offsets.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod gltf;
pub mod input;
pub mod visual;

pub use app::{keep_open, pause_open, App};
pub use gltf::{build_gltf, export_gltf};
pub use visual::{Visual, BB_DEBUG_PATH};

pub use mathplot_core::{
    Action, ColourMap, ColourMapType, Key, MathplotError, Modifiers, MouseButton, NeighbourMesh,
    Result, SavedView, Scale, SceneOptions, TriangleHit, SAVED_VIEW_PATH,
};
pub use mathplot_models::{
    BoundingBox, CoordArrows, DataModel, EyeVisual, ModelCommon, PolarVisual, RawModel,
    RhomboVisual, VertexBuffers, VisualModel, VisualTextModel, VoronoiVisual,
};
pub use mathplot_render::{
    BuiltinFont, Projection, ProjectionKind, RenderEngine, SceneView, SnapshotOptions,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Initializes logging for demo programs and tests.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
