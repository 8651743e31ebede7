//! Model kinds for mathplot.
//!
//! This crate provides the CPU side of the model pipeline:
//! - [`VertexBuffers`]: the parallel position/normal/colour sequences and
//!   index stream every model owns
//! - The geometry-primitive library (tubes, spheres, flat shapes, lines)
//! - The [`VisualModel`] trait with the shared finalize/reinit lifecycle
//! - [`DataModel`], which turns raw scalars or vectors into colours and
//!   z offsets
//! - [`VisualTextModel`] glyph-quad text, and the bundled model kinds

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::struct_excessive_bools)]

pub mod buffers;
pub mod coord_arrows;
pub mod datamodel;
pub mod eye;
pub mod model;
pub mod polar;
pub mod primitives;
pub mod rhombo;
pub mod text;
pub mod voronoi;

pub use buffers::{BoundingBox, VertexBuffers};
pub use coord_arrows::CoordArrows;
pub use datamodel::DataModel;
pub use eye::EyeVisual;
pub use model::{ModelCommon, RawModel, VisualModel};
pub use polar::PolarVisual;
pub use rhombo::RhomboVisual;
pub use text::VisualTextModel;
pub use voronoi::VoronoiVisual;

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
