//! Viewer configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::SHRINK_FACTOR;
use crate::palette::default_palette;

/// Tunables of a viewer instance. Every field has a default so a host can
/// pass a partial object (or nothing at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Fraction of each node position kept when pulling zones toward their
    /// centroid. 1.0 draws zones without gaps.
    pub shrink: f64,
    /// Inclusive [min, max] zoom scale.
    pub scale_extent: [f64; 2],
    /// Fill colours indexed by rank (wrapping).
    pub palette: Vec<String>,
    /// Gap in pixels between the pointer and the tooltip's bottom edge.
    pub tooltip_offset: f64,
    /// Tooltip fade duration in milliseconds.
    pub tooltip_fade_ms: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            shrink: SHRINK_FACTOR,
            scale_extent: [0.1, 100.0],
            palette: default_palette(),
            tooltip_offset: 3.0,
            tooltip_fade_ms: 250,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.shrink > 0.0 && self.shrink <= 1.0) {
            return Err(ConfigError::ShrinkFactor(self.shrink));
        }
        let [lo, hi] = self.scale_extent;
        if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
            return Err(ConfigError::ScaleExtent(lo, hi));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: ViewerConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette.len(), 16);
        assert_eq!(config.scale_extent, [0.1, 100.0]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{"shrink": 0.8}"#).unwrap();
        assert_eq!(config.shrink, 0.8);
        assert_eq!(config.tooltip_offset, 3.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ViewerConfig::default();
        config.shrink = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::ShrinkFactor(0.0)));

        config.shrink = 0.9;
        config.scale_extent = [10.0, 1.0];
        assert!(matches!(config.validate(), Err(ConfigError::ScaleExtent(..))));

        config.scale_extent = [0.1, 100.0];
        config.palette.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyPalette));

        assert!(ViewerConfig::from_json(r#"{"palette": []}"#).is_err());
    }
}
