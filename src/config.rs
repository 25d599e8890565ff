//! Board configuration: logical raster size and ink width tuning.
//!
//! A [`BoardConfig`] can be built in code or loaded from a TOML file. Either
//! way it passes through [`BoardConfig::validate`] before a board accepts it,
//! so inverted ink bounds or zero thresholds surface as typed errors instead
//! of undefined stroke widths.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest accepted surface side, bounded by the raster backend's i32 sizes.
pub const MAX_SIDE: u32 = 32_767;

/// Errors produced by configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid surface size {width}x{height}: both sides must be 1..={MAX_SIDE}")]
    InvalidSize { width: u32, height: u32 },

    #[error("invalid ink bounds: min_ink {min} must be positive, finite, and not above max_ink {max}")]
    InvalidInkBounds { min: f64, max: f64 },

    #[error("invalid {name} threshold {value}: must be positive and finite")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("failed to read config from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config from {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Logical surface size and stroke width tuning.
///
/// All fields have defaults, so a TOML file only needs the keys it overrides.
///
/// # Example TOML
/// ```toml
/// width = 800
/// height = 600
/// min_ink = 2.0
/// max_ink = 12.0
/// max_distance = 150.0
/// max_time = 80.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Logical raster width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Logical raster height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Thinnest rendered ink width in pixels
    #[serde(default = "default_min_ink")]
    pub min_ink: f64,

    /// Thickest rendered ink width in pixels
    #[serde(default = "default_max_ink")]
    pub max_ink: f64,

    /// Movement distance (px) at which segment width bottoms out
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,

    /// Dwell time (ms) at which steady-dot width tops out
    #[serde(default = "default_max_time")]
    pub max_time: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            min_ink: default_min_ink(),
            max_ink: default_max_ink(),
            max_distance: default_max_distance(),
            max_time: default_max_time(),
        }
    }
}

impl BoardConfig {
    /// Checks the configuration for values the renderer cannot honor.
    ///
    /// # Errors
    /// Returns the first violation found:
    /// - a zero or oversized surface side
    /// - `min_ink` non-positive, non-finite, or above `max_ink`
    /// - a non-positive or non-finite `max_distance` / `max_time`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 || self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        if !self.min_ink.is_finite()
            || !self.max_ink.is_finite()
            || self.min_ink <= 0.0
            || self.min_ink > self.max_ink
        {
            return Err(ConfigError::InvalidInkBounds {
                min: self.min_ink,
                max: self.max_ink,
            });
        }

        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "max_distance",
                value: self.max_distance,
            });
        }

        if !self.max_time.is_finite() || self.max_time <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "max_time",
                value: self.max_time,
            });
        }

        Ok(())
    }

    /// Loads a configuration from a TOML file, or returns defaults if the
    /// file does not exist.
    ///
    /// Missing keys fall back to their defaults; the loaded values are then
    /// validated.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, contains
    /// invalid TOML, or fails [`validate`](Self::validate).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {config:?}");

        Ok(config)
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_min_ink() -> f64 {
    1.0
}

fn default_max_ink() -> f64 {
    10.0
}

fn default_max_distance() -> f64 {
    100.0
}

fn default_max_time() -> f64 {
    100.0
}
