//! A planar Voronoi-cell surface from scattered coordinates.
//!
//! Each data point gets its Voronoi cell, computed by clipping a bounding
//! rectangle against the perpendicular bisectors of every other point. The
//! cell is drawn as a flat polygon coloured from the data model and lifted
//! by the scaled z value.

use glam::{Vec2, Vec3};

use crate::datamodel::DataModel;
use crate::model::{ModelCommon, VisualModel};

/// A Voronoi surface over scattered (x, y) coordinates.
pub struct VoronoiVisual {
    /// Shared model state.
    pub common: ModelCommon,
    /// Scaled data and colours; `data_coords` carry the cell seeds.
    pub data: DataModel,
    /// Margin added around the seed extents for the boundary cells.
    pub border: f32,
}

impl VoronoiVisual {
    /// A Voronoi surface at a world offset.
    #[must_use]
    pub fn new(offset: Vec3) -> Self {
        Self {
            common: ModelCommon::new("voronoi", offset),
            data: DataModel::new(),
            border: 0.1,
        }
    }

    /// Sets the seed coordinates and their scalar values.
    pub fn set_data(&mut self, coords: Vec<Vec3>, scalar_data: Vec<f32>) {
        self.data.data_coords = coords;
        self.data.scalar_data = Some(scalar_data);
    }

    /// Clips `polygon` to the half plane of points nearer `seed` than
    /// `other` (Sutherland-Hodgman against the perpendicular bisector).
    fn clip_to_bisector(polygon: &[Vec2], seed: Vec2, other: Vec2) -> Vec<Vec2> {
        let mid = (seed + other) * 0.5;
        let normal = other - seed;
        let inside = |p: Vec2| (p - mid).dot(normal) <= 0.0;

        let mut out = Vec::with_capacity(polygon.len() + 1);
        for (i, &current) in polygon.iter().enumerate() {
            let next = polygon[(i + 1) % polygon.len()];
            let (cin, nin) = (inside(current), inside(next));
            if cin {
                out.push(current);
            }
            if cin != nin {
                let denom = (next - current).dot(normal);
                if denom.abs() > f32::EPSILON {
                    let t = (mid - current).dot(normal) / denom;
                    out.push(current + (next - current) * t);
                }
            }
        }
        out
    }
}

impl VisualModel for VoronoiVisual {
    fn common(&self) -> &ModelCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ModelCommon {
        &mut self.common
    }

    fn init_vertices(&mut self) {
        let n = self.data.data_coords.len();
        if n == 0 || self.data.datasize() != n {
            log::error!(
                "voronoi: {} coordinates vs {} data values, nothing emitted",
                n,
                self.data.datasize()
            );
            return;
        }
        self.data.setup_scaling();

        let seeds: Vec<Vec2> = self
            .data
            .data_coords
            .iter()
            .map(|c| Vec2::new(c.x, c.y))
            .collect();
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for s in &seeds {
            min = min.min(*s);
            max = max.max(*s);
        }
        min -= Vec2::splat(self.border);
        max += Vec2::splat(self.border);

        for (i, &seed) in seeds.iter().enumerate() {
            let mut cell = vec![
                Vec2::new(min.x, min.y),
                Vec2::new(max.x, min.y),
                Vec2::new(max.x, max.y),
                Vec2::new(min.x, max.y),
            ];
            for (j, &other) in seeds.iter().enumerate() {
                if i == j || cell.is_empty() {
                    continue;
                }
                cell = Self::clip_to_bisector(&cell, seed, other);
            }
            if cell.len() < 3 {
                continue;
            }
            let z = self.data.dcopy[i];
            let rim: Vec<Vec3> = cell.iter().map(|p| Vec3::new(p.x, p.y, z)).collect();
            let centre = Vec3::new(seed.x, seed.y, z);
            self.common.buffers.flat_poly(centre, &rim, self.data.colour_of(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_sizes_log_and_emit_nothing() {
        let mut v = VoronoiVisual::new(Vec3::ZERO);
        v.set_data(vec![Vec3::ZERO, Vec3::X], vec![1.0]);
        v.finalize().unwrap();
        assert!(v.common.buffers.is_empty());
    }

    #[test]
    fn test_two_seeds_split_the_rectangle() {
        let mut v = VoronoiVisual::new(Vec3::ZERO);
        v.set_data(
            vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
            vec![0.0, 1.0],
        );
        v.finalize().unwrap();
        assert!(!v.common.buffers.is_empty());
        // The left seed's cell stays strictly left of the bisector x = 0
        // (and vice versa), within fan-centre tolerance.
        let vb = &v.common.buffers;
        // First cell: fan centre + rim vertices all have x <= 0.
        let first_cell_verts: u32 = 5; // rectangle clipped once -> 4 rim + centre
        for i in 0..first_cell_verts.min(vb.vertex_count()) {
            assert!(vb.position(i).x <= 1e-5);
        }
    }

    #[test]
    fn test_clip_halves_a_square() {
        let square = vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let clipped =
            VoronoiVisual::clip_to_bisector(&square, Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0));
        assert_eq!(clipped.len(), 4);
        for p in clipped {
            assert!(p.x <= 1e-6);
        }
    }

    #[test]
    fn test_quartered_grid_emits_four_cells() {
        let mut v = VoronoiVisual::new(Vec3::ZERO);
        v.set_data(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            vec![0.0, 0.3, 0.6, 1.0],
        );
        v.finalize().unwrap();
        // Four quadrilateral cells, each a fan of centre + 4 rim vertices.
        assert_eq!(v.common.buffers.vertex_count(), 4 * 5);
        v.common.buffers.check().unwrap();
    }
}
