// Runtime configuration passed in from JavaScript as JSON.
use serde::{Deserialize, Serialize};

use crate::error::{decode, Result, ViewerError};
use crate::simplify::Simplifier;

// Default cache limits
pub const DEFAULT_MAX_CACHED_LABELS: usize = 2000;
pub const DEFAULT_MAX_CACHED_GEOMETRIES: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub max_cached_labels: usize,
    pub max_cached_geometries: usize,
    pub simplifier: Simplifier,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            max_cached_labels: DEFAULT_MAX_CACHED_LABELS,
            max_cached_geometries: DEFAULT_MAX_CACHED_GEOMETRIES,
            simplifier: Simplifier::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a config object; missing fields take their defaults and a blank
    /// string gives the default config.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ViewerConfig = decode(json, "viewer config")?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.max_cached_labels == 0 {
            return Err(ViewerError::InvalidConfig("maxCachedLabels must be > 0".into()));
        }
        if self.max_cached_geometries == 0 {
            return Err(ViewerError::InvalidConfig("maxCachedGeometries must be > 0".into()));
        }
        Ok(self)
    }
}

/// Simplification settings from the viewer's form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimplifyOptions {
    pub tolerance: f64,
    pub high_quality: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            tolerance: 0.0,
            high_quality: true,
        }
    }
}

impl SimplifyOptions {
    pub fn simplifier(&self) -> Simplifier {
        if self.high_quality {
            Simplifier::HighQuality
        } else {
            Simplifier::Fast
        }
    }

    /// Whether these options change geometry at all.
    pub fn is_active(&self) -> bool {
        self.tolerance > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_config_is_default() {
        assert_eq!(ViewerConfig::from_json("  ").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{"maxCachedLabels": 10, "simplifier": "fast"}"#).unwrap();
        assert_eq!(config.max_cached_labels, 10);
        assert_eq!(config.max_cached_geometries, DEFAULT_MAX_CACHED_GEOMETRIES);
        assert_eq!(config.simplifier, Simplifier::Fast);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ViewerConfig::from_json(r#"{"maxCachedGeometries": 0}"#).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_config_is_a_decode_error() {
        let err = ViewerConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ViewerError::Decode { .. }));
    }

    #[test]
    fn simplify_options_pick_strategy() {
        let opts: SimplifyOptions = serde_json::from_str(r#"{"tolerance": 0.5, "highQuality": false}"#).unwrap();
        assert_eq!(opts.simplifier(), Simplifier::Fast);
        assert!(opts.is_active());
        assert!(!SimplifyOptions::default().is_active());
    }
}
