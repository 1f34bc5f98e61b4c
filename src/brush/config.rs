//! Placement controller settings, persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Settings for the [`Brushes`](super::Brushes) placement controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushesConfig {
    /// Uniform scale used when not matching the hover polygon
    pub default_scale: f32,
    /// Size the brush so its anchor polygon matches the hovered polygon
    pub scale_to_match: bool,
    /// Place at the hovered polygon's centroid instead of the hit point
    pub snap_to_hover_polygon: bool,
    pub snap_to_grid: bool,
    pub grid_cell_size: f32,
    /// Density for the default brush set
    pub default_density: f32,
    /// Name given to the preview node
    pub preview_name: String,
}

impl Default for BrushesConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            scale_to_match: true,
            snap_to_hover_polygon: true,
            snap_to_grid: false,
            grid_cell_size: 1.0,
            default_density: 1.0,
            preview_name: "brush preview".to_string(),
        }
    }
}

impl BrushesConfig {
    /// Load and validate a config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded brush settings from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_scale.is_finite() && self.default_scale > 0.0) {
            return Err(Error::Config(format!(
                "default_scale must be positive, got {}",
                self.default_scale
            )));
        }
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size >= 0.0) {
            return Err(Error::Config(format!(
                "grid_cell_size must not be negative, got {}",
                self.grid_cell_size
            )));
        }
        if !(self.default_density.is_finite() && self.default_density > 0.0) {
            return Err(Error::Config(format!(
                "default_density must be positive, got {}",
                self.default_density
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_persistence() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("settings").join("brushes.json");

        let config = BrushesConfig {
            default_scale: 0.5,
            snap_to_grid: true,
            grid_cell_size: 0.25,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = BrushesConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("brushes.json");
        std::fs::write(&path, r#"{ "scale_to_match": false }"#).unwrap();

        let loaded = BrushesConfig::load(&path).unwrap();
        assert!(!loaded.scale_to_match);
        assert_eq!(loaded.default_scale, 1.0);
        assert_eq!(loaded.preview_name, "brush preview");
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("brushes.json");

        std::fs::write(&path, r#"{ "default_scale": -1.0 }"#).unwrap();
        assert!(matches!(BrushesConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(BrushesConfig::load(&path), Err(Error::Json(_))));

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(BrushesConfig::load(&missing), Err(Error::Io(_))));
    }
}
