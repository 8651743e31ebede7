//! The data-bearing intermediate between raw measurements and geometry.
//!
//! A [`DataModel`] owns scalar or vector data plus the coordinates it was
//! sampled at, a colour map, and four scaling objects: `zscale` for the z
//! offset and one colour scale per colour channel. `setup_scaling` derives
//! the per-element z values (`dcopy`) and colour datums (`dcolour*`);
//! geometry generators then consume `dcopy[i]` as a z offset and
//! `colour_of(i)` as a vertex or face colour.

use glam::Vec3;

use mathplot_core::{ColourMap, ColourMapType, Scale};

/// Scaled data and colour state for one model.
#[derive(Debug, Clone, Default)]
pub struct DataModel {
    /// Scalar data, one value per coordinate.
    pub scalar_data: Option<Vec<f32>>,
    /// Vector data, one 3-vector per coordinate. Takes precedence over
    /// scalars when both are present.
    pub vector_data: Option<Vec<Vec3>>,
    /// Sample coordinates.
    pub data_coords: Vec<Vec3>,
    /// The colour map.
    pub colour_map: ColourMap,
    /// Scaling applied to the z output.
    pub zscale: Scale,
    /// Scaling applied to the first colour channel.
    pub colourscale: Scale,
    /// Scaling applied to the second colour channel.
    pub colourscale2: Scale,
    /// Scaling applied to the third colour channel.
    pub colourscale3: Scale,
    /// Scaled z values, one per element.
    pub dcopy: Vec<f32>,
    /// First colour datum per element.
    pub dcolour: Vec<f32>,
    /// Second colour datum per element (vector data only).
    pub dcolour2: Vec<f32>,
    /// Third colour datum per element (vector data only).
    pub dcolour3: Vec<f32>,
}

impl DataModel {
    /// A data model with default (autoscaling) scales and colour map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of data elements: the vector count when vector data is
    /// present, else the scalar count.
    #[must_use]
    pub fn datasize(&self) -> usize {
        if let Some(v) = &self.vector_data {
            v.len()
        } else {
            self.scalar_data.as_ref().map_or(0, Vec::len)
        }
    }

    /// Sets the colour map kind.
    pub fn set_colour_map(&mut self, map_type: ColourMapType) {
        self.colour_map = ColourMap::new(map_type);
    }

    /// Derives `dcopy` and the colour datums from the current data.
    ///
    /// NaN inputs become the z-transform of zero. Unless the colour map is
    /// one of the `Rgb*` kinds (whose inputs are assumed to be in
    /// `[0, 1]` already), the colour channels are independently rescaled
    /// by their colour scales.
    pub fn setup_scaling(&mut self) {
        let n = self.datasize();
        let raw: Vec<f32> = if let Some(vectors) = &self.vector_data {
            vectors.iter().map(|v| v.length()).collect()
        } else {
            self.scalar_data.clone().unwrap_or_default()
        };

        // z values: NaN maps to the transform of 0.
        let cleaned: Vec<f32> = raw
            .iter()
            .map(|&v| if v.is_nan() { 0.0 } else { v })
            .collect();
        self.zscale.reset();
        self.dcopy = self.zscale.transform(&cleaned);

        let rescale_colours = !matches!(
            self.colour_map.map_type,
            ColourMapType::Rgb | ColourMapType::RgbMono | ColourMapType::RgbGrey
        );

        if let Some(vectors) = &self.vector_data {
            let xs: Vec<f32> = vectors.iter().map(|v| v.x).collect();
            let ys: Vec<f32> = vectors.iter().map(|v| v.y).collect();
            let zs: Vec<f32> = vectors.iter().map(|v| v.z).collect();
            if rescale_colours {
                self.colourscale.reset();
                self.colourscale2.reset();
                self.colourscale3.reset();
                self.dcolour = self.colourscale.transform(&xs);
                self.dcolour2 = self.colourscale2.transform(&ys);
                self.dcolour3 = self.colourscale3.transform(&zs);
            } else {
                self.dcolour = xs;
                self.dcolour2 = ys;
                self.dcolour3 = zs;
            }
        } else {
            if rescale_colours {
                self.colourscale.reset();
                self.dcolour = self.colourscale.transform(&cleaned);
            } else {
                self.dcolour = cleaned;
            }
            self.dcolour2.clear();
            self.dcolour3.clear();
        }

        debug_assert_eq!(self.dcopy.len(), n);
    }

    /// The mapped colour of element `i`, dispatching on how many datums
    /// the colour map consumes.
    #[must_use]
    pub fn colour_of(&self, i: usize) -> Vec3 {
        let d1 = self.dcolour.get(i).copied().unwrap_or(0.0);
        match self.colour_map.datums() {
            2 => {
                let d2 = self.dcolour2.get(i).copied().unwrap_or(0.0);
                self.colour_map.convert2(d1, d2)
            }
            3 => {
                let d2 = self.dcolour2.get(i).copied().unwrap_or(0.0);
                let d3 = self.dcolour3.get(i).copied().unwrap_or(0.0);
                self.colour_map.convert3(d1, d2, d3)
            }
            _ => self.colour_map.convert(d1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_scaling_fills_dcopy_and_dcolour() {
        let mut dm = DataModel::new();
        dm.scalar_data = Some(vec![0.0, 5.0, 10.0]);
        dm.data_coords = vec![Vec3::ZERO; 3];
        dm.setup_scaling();
        assert_eq!(dm.datasize(), 3);
        assert!((dm.dcopy[0] - 0.0).abs() < 1e-6);
        assert!((dm.dcopy[2] - 1.0).abs() < 1e-6);
        assert!((dm.dcolour[1] - 0.5).abs() < 1e-6);
        assert!(dm.dcolour2.is_empty());
    }

    #[test]
    fn test_vector_data_takes_length_for_z() {
        let mut dm = DataModel::new();
        dm.vector_data = Some(vec![Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)]);
        dm.setup_scaling();
        // Lengths 0 and 5 autoscale to 0 and 1.
        assert!((dm.dcopy[0] - 0.0).abs() < 1e-6);
        assert!((dm.dcopy[1] - 1.0).abs() < 1e-6);
        assert_eq!(dm.dcolour.len(), 2);
        assert_eq!(dm.dcolour3.len(), 2);
    }

    #[test]
    fn test_nan_maps_to_z_transform_of_zero() {
        let mut dm = DataModel::new();
        dm.scalar_data = Some(vec![-1.0, f32::NAN, 1.0]);
        dm.setup_scaling();
        // Autoscale over [-1, 1]: 0 maps to 0.5.
        assert!((dm.dcopy[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_map_skips_rescale() {
        let mut dm = DataModel::new();
        dm.set_colour_map(ColourMapType::Rgb);
        dm.vector_data = Some(vec![Vec3::new(0.25, 0.5, 0.75)]);
        dm.setup_scaling();
        let c = dm.colour_of(0);
        assert!((c - Vec3::new(0.25, 0.5, 0.75)).length() < 1e-6);
    }

    #[test]
    fn test_colour_of_single_datum_map() {
        let mut dm = DataModel::new();
        dm.set_colour_map(ColourMapType::Grey);
        dm.scalar_data = Some(vec![0.0, 10.0]);
        dm.setup_scaling();
        assert!((dm.colour_of(0) - Vec3::ZERO).length() < 1e-6);
        assert!((dm.colour_of(1) - Vec3::ONE).length() < 1e-6);
    }
}
