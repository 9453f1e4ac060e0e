//! Octree construction parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::core::{Error, Result};

/// Deepest subdivision the tree accepts. Cube widths below `2^-20` of the
/// stock lose meaning in `f32`.
pub const MAX_SUPPORTED_DEPTH: u8 = 20;

/// Parameters for building a stock octree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Half-width of the root cube in world units
    pub root_scale: f32,
    /// Maximum subdivision depth (leaf width = 2 * root_scale / 2^max_depth)
    pub max_depth: u8,
    /// Center of the root cube
    pub center: [f32; 3],
    /// Uniform refinement passes applied right after construction
    pub init_depth: u8,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            root_scale: 10.0,
            max_depth: 6,
            center: [0.0; 3],
            init_depth: 2,
        }
    }
}

impl OctreeConfig {
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }

    /// Check the parameters without building anything
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.root_scale, self.max_depth)?;
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(Error::config(format!("center {:?} is not finite", self.center)));
        }
        if self.init_depth > self.max_depth {
            return Err(Error::config(format!(
                "init_depth {} exceeds max_depth {}",
                self.init_depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// Save to file as pretty JSON
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file and validate. Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded octree config from {}", path.display());
        Ok(config)
    }
}

/// Shared checks for the root scale and depth limit
pub(crate) fn validate_dimensions(root_scale: f32, max_depth: u8) -> Result<()> {
    if !root_scale.is_finite() || root_scale <= 0.0 {
        return Err(Error::config(format!(
            "root scale must be positive and finite, got {}",
            root_scale
        )));
    }
    if max_depth == 0 {
        return Err(Error::config("max_depth must be at least 1"));
    }
    if max_depth > MAX_SUPPORTED_DEPTH {
        return Err(Error::config(format!(
            "max_depth {} exceeds supported limit {}",
            max_depth, MAX_SUPPORTED_DEPTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        assert!(OctreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        for (scale, depth) in [(0.0, 3), (-1.0, 3), (f32::NAN, 3), (f32::INFINITY, 3), (1.0, 0), (1.0, 21)] {
            let config = OctreeConfig {
                root_scale: scale,
                max_depth: depth,
                init_depth: 0,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration(_))),
                "scale {} depth {} should be rejected",
                scale,
                depth
            );
        }
    }

    #[test]
    fn test_rejects_init_deeper_than_max() {
        let config = OctreeConfig {
            max_depth: 3,
            init_depth: 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("stock.json");
        std::fs::write(&path, r#"{ "root_scale": 25.0, "center": [1.0, 2.0, 3.0] }"#).expect("write failed");

        let config = OctreeConfig::load_sync(&path).expect("load failed");
        assert_eq!(config.root_scale, 25.0);
        assert_eq!(config.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.max_depth, OctreeConfig::default().max_depth);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("stock.json");
        let config = OctreeConfig {
            root_scale: 4.0,
            max_depth: 8,
            center: [0.5, 0.0, -0.5],
            init_depth: 3,
        };
        config.save_sync(&path).expect("save failed");
        assert_eq!(OctreeConfig::load_sync(&path).expect("load failed"), config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "root_scale": -2.0 }"#).expect("write failed");
        assert!(matches!(OctreeConfig::load_sync(&path), Err(Error::InvalidConfiguration(_))));

        std::fs::write(&path, "not json").expect("write failed");
        assert!(matches!(OctreeConfig::load_sync(&path), Err(Error::Json(_))));
    }
}
