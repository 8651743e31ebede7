//! Persisted scene view state.
//!
//! On Ctrl+Z the scene writes its translation and rotation to
//! `/tmp/Visual.json`; on construction it reads the file back (all fields
//! optional) to pre-populate the default view.

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default location of the persisted view file.
pub const SAVED_VIEW_PATH: &str = "/tmp/Visual.json";

/// The persisted scene translation and rotation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SavedView {
    #[serde(default)]
    pub scenetrans_x: Option<f32>,
    #[serde(default)]
    pub scenetrans_y: Option<f32>,
    #[serde(default)]
    pub scenetrans_z: Option<f32>,
    #[serde(default)]
    pub scenerotn_w: Option<f32>,
    #[serde(default)]
    pub scenerotn_x: Option<f32>,
    #[serde(default)]
    pub scenerotn_y: Option<f32>,
    #[serde(default)]
    pub scenerotn_z: Option<f32>,
}

impl SavedView {
    /// Builds a record from a translation and rotation.
    #[must_use]
    pub fn from_view(translation: Vec3, rotation: Quat) -> Self {
        Self {
            scenetrans_x: Some(translation.x),
            scenetrans_y: Some(translation.y),
            scenetrans_z: Some(translation.z),
            scenerotn_w: Some(rotation.w),
            scenerotn_x: Some(rotation.x),
            scenerotn_y: Some(rotation.y),
            scenerotn_z: Some(rotation.z),
        }
    }

    /// The stored translation, with `fallback` filling absent fields.
    #[must_use]
    pub fn translation_or(&self, fallback: Vec3) -> Vec3 {
        Vec3::new(
            self.scenetrans_x.unwrap_or(fallback.x),
            self.scenetrans_y.unwrap_or(fallback.y),
            self.scenetrans_z.unwrap_or(fallback.z),
        )
    }

    /// The stored rotation, with `fallback` filling absent fields.
    #[must_use]
    pub fn rotation_or(&self, fallback: Quat) -> Quat {
        Quat::from_xyzw(
            self.scenerotn_x.unwrap_or(fallback.x),
            self.scenerotn_y.unwrap_or(fallback.y),
            self.scenerotn_z.unwrap_or(fallback.z),
            self.scenerotn_w.unwrap_or(fallback.w),
        )
    }

    /// Writes the record as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a record from JSON, or `None` if the file does not exist or
    /// does not parse. Parse failures are logged, not fatal.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(view) => Some(view),
            Err(e) => {
                log::warn!("could not parse saved view {}: {e}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tr = Vec3::new(0.5, -1.25, -7.0);
        let rot = Quat::from_rotation_y(0.3);
        let view = SavedView::from_view(tr, rot);
        let path = std::env::temp_dir().join("mathplot_saved_view_test.json");
        view.save(&path).unwrap();
        let back = SavedView::load(&path).unwrap();
        assert!((back.translation_or(Vec3::ZERO) - tr).length() < 1e-6);
        let q = back.rotation_or(Quat::IDENTITY);
        assert!((q.w - rot.w).abs() < 1e-6 && (q.y - rot.y).abs() < 1e-6);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_partial_fields_use_fallback() {
        let view: SavedView = serde_json::from_str(r#"{"scenetrans_z": -4.0}"#).unwrap();
        let tr = view.translation_or(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(tr, Vec3::new(1.0, 2.0, -4.0));
        let q = view.rotation_or(Quat::IDENTITY);
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(SavedView::load("/nonexistent/path/Visual.json").is_none());
    }
}
