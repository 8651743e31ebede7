//! Colour maps: functions from one, two or three scalars in `[0, 1]` to RGB.
//!
//! Most maps consume a single datum sampled from a stored colour table with
//! linear interpolation. The `HsvWheel` map consumes two datums (interpreted
//! as a position on a hue disc) and the `Rgb*` maps consume three datums that
//! are assumed to already lie in `[0, 1]`.

use glam::Vec3;

/// The kind of colour map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourMapType {
    /// Perceptually uniform green-to-yellow map.
    #[default]
    Viridis,
    /// Perceptually uniform purple-to-yellow map.
    Plasma,
    /// Perceptually uniform black-to-yellow map.
    Inferno,
    /// Classic blue-to-red rainbow.
    Jet,
    /// Black to white.
    Grey,
    /// Diverging blue-white-red.
    Coolwarm,
    /// Single-hue ramp from black; hue set by [`ColourMap::set_hue`].
    Monochrome,
    /// Two-datum map: position on an HSV hue disc (angle, radius).
    HsvWheel,
    /// Three-datum map: datums are the RGB triplet verbatim.
    Rgb,
    /// Three-datum map: luminance of the RGB triplet on a single hue.
    RgbMono,
    /// Three-datum map: luminance of the RGB triplet as grey.
    RgbGrey,
}

/// A colour map with an optional hue rotation.
#[derive(Debug, Clone)]
pub struct ColourMap {
    /// The map kind.
    pub map_type: ColourMapType,
    /// Hue in `[0, 1)` used by `Monochrome`, `RgbMono` and as a rotation of
    /// the `HsvWheel`.
    hue: f32,
}

impl Default for ColourMap {
    fn default() -> Self {
        Self::new(ColourMapType::Viridis)
    }
}

impl ColourMap {
    /// Creates a colour map of the given kind.
    #[must_use]
    pub fn new(map_type: ColourMapType) -> Self {
        Self { map_type, hue: 0.0 }
    }

    /// Sets the hue (wrapped into `[0, 1)`) for the single-hue maps.
    pub fn set_hue(&mut self, hue: f32) {
        self.hue = hue.rem_euclid(1.0);
    }

    /// Returns the hue.
    #[must_use]
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Number of datums this map consumes per element (1, 2 or 3).
    #[must_use]
    pub fn datums(&self) -> usize {
        match self.map_type {
            ColourMapType::HsvWheel => 2,
            ColourMapType::Rgb | ColourMapType::RgbMono | ColourMapType::RgbGrey => 3,
            _ => 1,
        }
    }

    /// Maps a single datum to RGB. Only meaningful when `datums() == 1`.
    #[must_use]
    pub fn convert(&self, datum: f32) -> Vec3 {
        let t = datum.clamp(0.0, 1.0);
        match self.map_type {
            ColourMapType::Viridis => sample_table(&VIRIDIS, t),
            ColourMapType::Plasma => sample_table(&PLASMA, t),
            ColourMapType::Inferno => sample_table(&INFERNO, t),
            ColourMapType::Jet => jet(t),
            ColourMapType::Grey => Vec3::splat(t),
            ColourMapType::Coolwarm => sample_table(&COOLWARM, t),
            ColourMapType::Monochrome => hsv_to_rgb(self.hue, 1.0, t),
            // Multi-datum maps degrade to grey on the single-datum path.
            _ => Vec3::splat(t),
        }
    }

    /// Maps two datums (hue-disc angle fraction and radius) to RGB.
    #[must_use]
    pub fn convert2(&self, d1: f32, d2: f32) -> Vec3 {
        match self.map_type {
            ColourMapType::HsvWheel => {
                let angle = (d1 + self.hue).rem_euclid(1.0);
                hsv_to_rgb(angle, d2.clamp(0.0, 1.0), 1.0)
            }
            _ => self.convert(d1),
        }
    }

    /// Maps three datums to RGB.
    #[must_use]
    pub fn convert3(&self, d1: f32, d2: f32, d3: f32) -> Vec3 {
        let (r, g, b) = (d1.clamp(0.0, 1.0), d2.clamp(0.0, 1.0), d3.clamp(0.0, 1.0));
        match self.map_type {
            ColourMapType::Rgb => Vec3::new(r, g, b),
            ColourMapType::RgbMono => {
                hsv_to_rgb(self.hue, 1.0, luminance(r, g, b))
            }
            ColourMapType::RgbGrey => Vec3::splat(luminance(r, g, b)),
            _ => self.convert(d1),
        }
    }
}

/// Rec. 601 luma.
fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// HSV to RGB with h, s, v all in `[0, 1]`.
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i as i32 % 6 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// Samples an evenly spaced colour table with linear interpolation.
fn sample_table(table: &[Vec3], t: f32) -> Vec3 {
    let n = table.len() - 1;
    let idx = ((t * n as f32).floor() as usize).min(n - 1);
    let frac = t * n as f32 - idx as f32;
    table[idx].lerp(table[idx + 1], frac)
}

/// Analytic jet: piecewise-linear blue → cyan → yellow → red.
fn jet(t: f32) -> Vec3 {
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    Vec3::new(r, g, b)
}

const VIRIDIS: [Vec3; 11] = [
    Vec3::new(0.267, 0.004, 0.329),
    Vec3::new(0.282, 0.140, 0.457),
    Vec3::new(0.253, 0.265, 0.529),
    Vec3::new(0.206, 0.371, 0.553),
    Vec3::new(0.163, 0.471, 0.558),
    Vec3::new(0.127, 0.566, 0.550),
    Vec3::new(0.134, 0.658, 0.517),
    Vec3::new(0.266, 0.749, 0.440),
    Vec3::new(0.477, 0.821, 0.318),
    Vec3::new(0.741, 0.873, 0.150),
    Vec3::new(0.993, 0.906, 0.144),
];

const PLASMA: [Vec3; 9] = [
    Vec3::new(0.050, 0.030, 0.528),
    Vec3::new(0.294, 0.012, 0.631),
    Vec3::new(0.492, 0.012, 0.658),
    Vec3::new(0.658, 0.134, 0.588),
    Vec3::new(0.798, 0.280, 0.470),
    Vec3::new(0.902, 0.425, 0.360),
    Vec3::new(0.973, 0.586, 0.252),
    Vec3::new(0.993, 0.771, 0.155),
    Vec3::new(0.940, 0.975, 0.131),
];

const INFERNO: [Vec3; 9] = [
    Vec3::new(0.001, 0.000, 0.014),
    Vec3::new(0.118, 0.047, 0.283),
    Vec3::new(0.317, 0.072, 0.485),
    Vec3::new(0.513, 0.148, 0.508),
    Vec3::new(0.705, 0.215, 0.425),
    Vec3::new(0.869, 0.317, 0.294),
    Vec3::new(0.966, 0.489, 0.148),
    Vec3::new(0.988, 0.702, 0.120),
    Vec3::new(0.988, 0.998, 0.645),
];

const COOLWARM: [Vec3; 5] = [
    Vec3::new(0.230, 0.299, 0.754),
    Vec3::new(0.552, 0.690, 0.996),
    Vec3::new(0.866, 0.866, 0.866),
    Vec3::new(0.956, 0.604, 0.486),
    Vec3::new(0.706, 0.016, 0.150),
];
