//! Scaling transforms for mapping raw data onto plot axes and colour maps.
//!
//! A [`Scale`] is a small transform object: it is either set up explicitly
//! with a gradient and offset, or autoscaled from a data slice so that the
//! data's extent maps onto a configurable output range (by default `[0, 1]`).
//! Data models keep one scale per output channel (`z`, and up to three
//! colour channels).

/// The functional form of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFn {
    /// `out = gradient * in + offset`.
    #[default]
    Linear,
    /// `out = gradient * log10(in) + offset`. Non-positive inputs clamp to
    /// the smallest positive autoscaled input.
    Logarithmic,
}

/// An autoscaling 1-D transform.
#[derive(Debug, Clone)]
pub struct Scale {
    /// Functional form applied to inputs.
    pub scale_fn: ScaleFn,
    /// Whether parameters have been computed or set.
    pub ready: bool,
    /// Whether `transform` should autoscale from the first data it sees.
    pub do_autoscale: bool,
    /// Output range minimum.
    pub output_min: f32,
    /// Output range maximum.
    pub output_max: f32,
    gradient: f32,
    offset: f32,
    /// Smallest positive input seen during autoscale; log fallback value.
    min_positive: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            scale_fn: ScaleFn::Linear,
            ready: false,
            do_autoscale: true,
            output_min: 0.0,
            output_max: 1.0,
            gradient: 1.0,
            offset: 0.0,
            min_positive: f32::MIN_POSITIVE,
        }
    }
}

impl Scale {
    /// Creates an autoscaling linear scale with output range `[0, 1]`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an identity scale (no autoscaling, `out = in`).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            do_autoscale: false,
            ready: true,
            ..Self::default()
        }
    }

    /// Creates a fixed linear scale `out = gradient * in + offset`.
    #[must_use]
    pub fn with_params(gradient: f32, offset: f32) -> Self {
        Self {
            do_autoscale: false,
            ready: true,
            gradient,
            offset,
            ..Self::default()
        }
    }

    /// Sets the output range used by autoscaling.
    pub fn set_output_range(&mut self, min: f32, max: f32) {
        self.output_min = min;
        self.output_max = max;
        self.ready = false;
    }

    /// Computes gradient and offset so that the extent of `data` maps onto
    /// the output range. NaN entries are ignored.
    pub fn autoscale_from(&mut self, data: &[f32]) {
        let mut in_min = f32::MAX;
        let mut in_max = f32::MIN;
        let mut min_pos = f32::MAX;
        for &v in data {
            if v.is_nan() {
                continue;
            }
            in_min = in_min.min(v);
            in_max = in_max.max(v);
            if v > 0.0 {
                min_pos = min_pos.min(v);
            }
        }
        if in_min > in_max {
            // No finite data; identity parameters.
            self.gradient = 1.0;
            self.offset = 0.0;
            self.ready = true;
            return;
        }
        self.min_positive = if min_pos < f32::MAX {
            min_pos
        } else {
            f32::MIN_POSITIVE
        };
        let (in_min, in_max) = match self.scale_fn {
            ScaleFn::Linear => (in_min, in_max),
            ScaleFn::Logarithmic => (self.min_positive.log10(), in_max.max(self.min_positive).log10()),
        };
        let span = in_max - in_min;
        if span.abs() < f32::EPSILON {
            self.gradient = 0.0;
            self.offset = 0.5 * (self.output_min + self.output_max);
        } else {
            self.gradient = (self.output_max - self.output_min) / span;
            self.offset = self.output_min - self.gradient * in_min;
        }
        self.ready = true;
    }

    /// Transforms a single value. Autoscales are not triggered here; call
    /// [`Scale::transform`] or [`Scale::autoscale_from`] first if needed.
    #[must_use]
    pub fn transform_one(&self, v: f32) -> f32 {
        let v = match self.scale_fn {
            ScaleFn::Linear => v,
            ScaleFn::Logarithmic => {
                if v > 0.0 {
                    v.log10()
                } else {
                    self.min_positive.log10()
                }
            }
        };
        self.gradient * v + self.offset
    }

    /// Transforms a slice, autoscaling first if configured and not ready.
    pub fn transform(&mut self, data: &[f32]) -> Vec<f32> {
        if self.do_autoscale && !self.ready {
            self.autoscale_from(data);
        }
        data.iter().map(|&v| self.transform_one(v)).collect()
    }

    /// Resets autoscale state so the next `transform` re-derives parameters.
    pub fn reset(&mut self) {
        if self.do_autoscale {
            self.ready = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoscale_maps_extent_to_output_range() {
        let mut s = Scale::new();
        let out = s.transform(&[2.0, 4.0, 6.0]);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_identity_scale() {
        let mut s = Scale::identity();
        let out = s.transform(&[-3.0, 0.0, 7.5]);
        assert_eq!(out, vec![-3.0, 0.0, 7.5]);
    }

    #[test]
    fn test_constant_data_maps_to_midrange() {
        let mut s = Scale::new();
        let out = s.transform(&[5.0, 5.0, 5.0]);
        for v in out {
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_custom_output_range() {
        let mut s = Scale::new();
        s.set_output_range(-1.0, 1.0);
        let out = s.transform(&[0.0, 10.0]);
        assert!((out[0] + 1.0).abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_log_scale_positive_data() {
        let mut s = Scale {
            scale_fn: ScaleFn::Logarithmic,
            ..Scale::new()
        };
        let out = s.transform(&[1.0, 10.0, 100.0]);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_nan_ignored_in_autoscale() {
        let mut s = Scale::new();
        s.autoscale_from(&[f32::NAN, 0.0, 2.0]);
        assert!((s.transform_one(1.0) - 0.5).abs() < 1e-6);
    }
}
