// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout grid configuration.
//!
//! Grid spacing is loaded from a RON file such as:
//!
//! ```ron
//! GridConfig(
//!     grid_size_x: 200.0,
//!     grid_size_y: 100.0,
//! )
//! ```

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default horizontal spacing between layout columns
pub const DEFAULT_GRID_SIZE_X: f64 = 200.0;

/// Default vertical spacing between layout rows
pub const DEFAULT_GRID_SIZE_Y: f64 = 100.0;

/// Grid spacing used by automatic layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of one layout column
    pub grid_size_x: f64,
    /// Height of one layout row
    pub grid_size_y: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size_x: DEFAULT_GRID_SIZE_X,
            grid_size_y: DEFAULT_GRID_SIZE_Y,
        }
    }
}

impl GridConfig {
    /// Create a grid with the given spacing
    pub fn new(grid_size_x: f64, grid_size_y: f64) -> Result<Self> {
        let config = Self {
            grid_size_x,
            grid_size_y,
        };
        config.validate()?;
        Ok(config)
    }

    /// Half-extent of the occupancy probe (a quarter-row neighborhood)
    pub fn probe_tolerance(&self) -> f64 {
        self.grid_size_y / 8.0
    }

    /// Check that both spacings are positive finite numbers
    pub fn validate(&self) -> Result<()> {
        for (axis, size) in [("x", self.grid_size_x), ("y", self.grid_size_y)] {
            if !size.is_finite() || size <= 0.0 {
                return Err(GraphError::InvalidConfig(format!(
                    "grid_size_{axis} must be a positive finite number, got {size}"
                )));
            }
        }
        Ok(())
    }

    /// Load a grid configuration from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Parse a grid configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        let config: GridConfig = ron::from_str(content)?;
        config.validate()?;
        tracing::debug!(
            "Loaded grid config {}x{}",
            config.grid_size_x,
            config.grid_size_y
        );
        Ok(config)
    }

    /// Save the configuration as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.grid_size_x, DEFAULT_GRID_SIZE_X);
        assert_eq!(config.grid_size_y, DEFAULT_GRID_SIZE_Y);
        assert_eq!(config.probe_tolerance(), DEFAULT_GRID_SIZE_Y / 8.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = GridConfig::from_ron("GridConfig(grid_size_x: 320.0)").unwrap();
        assert_eq!(config.grid_size_x, 320.0);
        assert_eq!(config.grid_size_y, DEFAULT_GRID_SIZE_Y);
    }

    #[test]
    fn test_rejects_bad_spacing() {
        assert!(GridConfig::new(0.0, 10.0).is_err());
        assert!(GridConfig::new(10.0, f64::NAN).is_err());
        assert!(GridConfig::from_ron("GridConfig(grid_size_y: -5.0)").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.ron");
        let config = GridConfig::new(150.0, 75.0).unwrap();
        config.save(&path).unwrap();
        assert_eq!(GridConfig::load(&path).unwrap(), config);
    }
}
