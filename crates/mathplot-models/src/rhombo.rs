//! A rhombohedron model.

use glam::Vec3;

use crate::model::{ModelCommon, VisualModel};

/// The parallelepiped spanned by three edge vectors.
pub struct RhomboVisual {
    /// Shared model state.
    pub common: ModelCommon,
    /// First edge vector.
    pub edge1: Vec3,
    /// Second edge vector.
    pub edge2: Vec3,
    /// Third edge vector.
    pub edge3: Vec3,
    /// Face colour.
    pub colour: Vec3,
}

impl RhomboVisual {
    /// A rhombohedron at a world offset.
    #[must_use]
    pub fn new(offset: Vec3, edge1: Vec3, edge2: Vec3, edge3: Vec3, colour: Vec3) -> Self {
        Self {
            common: ModelCommon::new("rhombo", offset),
            edge1,
            edge2,
            edge3,
            colour,
        }
    }
}

impl VisualModel for RhomboVisual {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {
        self.common
            .buffers
            .rhombus(Vec3::ZERO, self.edge1, self.edge2, self.edge3, self.colour);
    }
}
