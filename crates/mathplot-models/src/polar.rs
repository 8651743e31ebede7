//! A polar-grid surface model.
//!
//! Samples a scalar field on a disc: `rings` concentric circles of
//! `sectors` points around a centre vertex. The scaled data provides the z
//! offset and the colour of each grid point.

use glam::Vec3;

use crate::datamodel::DataModel;
use crate::model::{ModelCommon, VisualModel};

/// A disc surface on a polar sampling grid.
pub struct PolarVisual {
    /// Shared model state.
    pub common: ModelCommon,
    /// Scaled data and colours.
    pub data: DataModel,
    /// Disc radius.
    pub radius: f32,
    /// Number of concentric rings (excluding the centre point).
    pub rings: u32,
    /// Points per ring.
    pub sectors: u32,
}

impl PolarVisual {
    /// A polar surface at a world offset.
    #[must_use]
    pub fn new(offset: Vec3, radius: f32, rings: u32, sectors: u32) -> Self {
        Self {
            common: ModelCommon::new("polar", offset),
            data: DataModel::new(),
            radius,
            rings: rings.max(1),
            sectors: sectors.max(3),
        }
    }

    /// Number of data elements the grid expects: the centre plus
    /// `rings * sectors` ring points.
    #[must_use]
    pub fn expected_datasize(&self) -> usize {
        1 + (self.rings * self.sectors) as usize
    }

    /// The sample coordinates of the grid, centre first, then ring by ring
    /// outward.
    #[must_use]
    pub fn grid_coords(&self) -> Vec<Vec3> {
        let mut coords = Vec::with_capacity(self.expected_datasize());
        coords.push(Vec3::ZERO);
        for ring in 1..=self.rings {
            let r = self.radius * ring as f32 / self.rings as f32;
            for sector in 0..self.sectors {
                let t = std::f32::consts::TAU * sector as f32 / self.sectors as f32;
                coords.push(Vec3::new(r * t.cos(), r * t.sin(), 0.0));
            }
        }
        coords
    }

    /// Fills `data_coords` from the grid and attaches the scalar data.
    pub fn set_scalar_data(&mut self, scalar_data: Vec<f32>) {
        self.data.data_coords = self.grid_coords();
        self.data.scalar_data = Some(scalar_data);
    }

    /// Recomputes only the vertex colours from the current data, leaving
    /// positions and topology untouched, then marks the colour buffer for
    /// re-upload.
    pub fn update_colours(&mut self) -> mathplot_core::Result<()> {
        self.data.setup_scaling();
        let n = self.common.buffers.vertex_count();
        for i in 0..n {
            self.common.buffers.set_colour(i, self.data.colour_of(i as usize));
        }
        self.reinit_colour_buffer()
    }
}

impl VisualModel for PolarVisual {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {
        if self.data.datasize() != self.expected_datasize() {
            log::error!(
                "polar: datasize {} does not match grid size {}",
                self.data.datasize(),
                self.expected_datasize()
            );
            return;
        }
        self.data.setup_scaling();

        let coords = self.grid_coords();
        let up = Vec3::Z;
        for (i, coord) in coords.iter().enumerate() {
            let z = self.data.dcopy[i];
            self.common
                .buffers
                .push_vertex(*coord + up * z, up, self.data.colour_of(i));
        }

        let s = self.sectors;
        // Centre fan to the first ring.
        for j in 0..s {
            let k = (j + 1) % s;
            self.common.buffers.push_triangle(0, 1 + j, 1 + k);
        }
        // Quad strips between consecutive rings.
        for ring in 0..self.rings - 1 {
            let a = 1 + ring * s;
            let b = a + s;
            for j in 0..s {
                let k = (j + 1) % s;
                self.common.buffers.push_triangle(a + j, b + j, b + k);
                self.common.buffers.push_triangle(a + j, b + k, a + k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_polar(rings: u32, sectors: u32) -> PolarVisual {
        let mut polar = PolarVisual::new(Vec3::ZERO, 1.0, rings, sectors);
        let n = polar.expected_datasize();
        polar.set_scalar_data((0..n).map(|i| i as f32).collect());
        polar
    }

    #[test]
    fn test_grid_counts() {
        let mut polar = filled_polar(4, 12);
        polar.finalize().unwrap();
        assert_eq!(polar.common.buffers.vertex_count() as usize, 1 + 4 * 12);
        // Fan (sectors) plus 3 ring bands (2 * sectors each).
        assert_eq!(polar.common.buffers.indices.len(), 3 * (12 + 3 * 2 * 12));
        polar.common.buffers.check().unwrap();
    }

    #[test]
    fn test_mismatched_data_emits_nothing() {
        let mut polar = PolarVisual::new(Vec3::ZERO, 1.0, 4, 12);
        polar.set_scalar_data(vec![1.0, 2.0]);
        polar.finalize().unwrap();
        assert!(polar.common.buffers.is_empty());
    }

    #[test]
    fn test_colour_only_update_leaves_positions_untouched() {
        let mut polar = filled_polar(3, 8);
        polar.finalize().unwrap();
        let positions_before = polar.common.buffers.positions.clone();
        let colours_before = polar.common.buffers.colors.clone();

        let n = polar.expected_datasize();
        polar.data.scalar_data = Some((0..n).map(|i| -(i as f32)).collect());
        polar.update_colours().unwrap();

        assert_eq!(polar.common.buffers.positions, positions_before);
        assert_ne!(polar.common.buffers.colors, colours_before);
        assert!(polar.common.colours_dirty);
    }

    #[test]
    fn test_reinit_is_idempotent_for_unchanged_data() {
        let mut polar = filled_polar(3, 8);
        polar.finalize().unwrap();
        let before = polar.common.buffers.clone();
        polar.reinit().unwrap();
        assert_eq!(polar.common.buffers, before);
    }
}
