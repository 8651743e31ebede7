//! Core abstractions for mathplot.
//!
//! This crate provides the GPU-free foundations used throughout mathplot:
//! - [`Scale`] autoscaling transforms and [`ColourMap`]s for data-to-colour
//!   mapping
//! - The [`NeighbourMesh`] post-processor and ray/triangle queries
//! - The input event vocabulary shared by window adapters
//! - Scene options and the persisted view state

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod colormap;
pub mod error;
pub mod keycode;
pub mod mesh;
pub mod options;
pub mod saved_view;
pub mod scale;

pub use colormap::{hsv_to_rgb, ColourMap, ColourMapType};
pub use error::{MathplotError, Result};
pub use keycode::{Action, Key, Modifiers, MouseButton};
pub use mesh::{ray_tri_intersection, MeshTriangle, NeighbourMesh, TriangleHit};
pub use options::SceneOptions;
pub use saved_view::{SavedView, SAVED_VIEW_PATH};
pub use scale::{Scale, ScaleFn};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
