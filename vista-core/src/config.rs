//! Engine configuration
//!
//! Field names serialize in camelCase so host-side option objects
//! (`threshold`, `rootMarginPx`, `maxTiltDeg`, `hoverScale`) map directly.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Insets;
use crate::margin::{parse_root_margin, MarginParseError};

/// Errors raised when validating a configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold must be within [0, 1], got {0}")]
    Threshold(f32),
    #[error("root margin values must be finite")]
    RootMargin,
    #[error("max tilt must be finite and non-negative, got {0}")]
    MaxTilt(f32),
    #[error("hover scale must be finite and positive, got {0}")]
    HoverScale(f32),
    #[error("perspective must be finite and positive, got {0}")]
    Perspective(f32),
    #[error(transparent)]
    Margin(#[from] MarginParseError),
}

/// Settings for one [`RevealTracker`](crate::RevealTracker)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealConfig {
    /// Minimum visible fraction of the element before it counts as entered
    pub threshold: f32,
    /// Adjustment applied to the viewport before measuring visibility
    #[serde(rename = "rootMarginPx")]
    pub root_margin: Insets,
}

impl RevealConfig {
    pub fn new(threshold: f32, root_margin: Insets) -> Self {
        Self {
            threshold,
            root_margin,
        }
    }

    /// Build from a CSS-style margin string, e.g. `"0px 0px -50px 0px"`
    pub fn with_margin_str(threshold: f32, root_margin: &str) -> Result<Self, ConfigError> {
        let config = Self::new(threshold, parse_root_margin(root_margin)?);
        config.validate()?;
        Ok(config)
    }

    /// The service card grid: reveal at 10% with the bottom edge pulled up 50px
    pub fn card_grid() -> Self {
        Self::new(0.1, Insets::new(0.0, 0.0, -50.0, 0.0))
    }

    /// The showcase rows: reveal at 15%, no margin
    pub fn showcase() -> Self {
        Self::new(0.15, Insets::zero())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if !self.root_margin.is_finite() {
            return Err(ConfigError::RootMargin);
        }
        Ok(())
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::card_grid()
    }
}

/// Settings for a [`TiltInteractor`](crate::TiltInteractor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TiltConfig {
    /// Rotation in degrees when the pointer sits on an edge
    pub max_tilt_deg: f32,
    /// Uniform scale while hovered
    pub hover_scale: f32,
    /// Perspective distance, in the host's length units
    pub perspective: f32,
}

impl TiltConfig {
    pub const DEFAULT_MAX_TILT_DEG: f32 = 6.0;
    pub const DEFAULT_HOVER_SCALE: f32 = 1.02;
    pub const DEFAULT_PERSPECTIVE: f32 = 900.0;

    pub fn new(max_tilt_deg: f32, hover_scale: f32) -> Self {
        Self {
            max_tilt_deg,
            hover_scale,
            perspective: Self::DEFAULT_PERSPECTIVE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_tilt_deg.is_finite() || self.max_tilt_deg < 0.0 {
            return Err(ConfigError::MaxTilt(self.max_tilt_deg));
        }
        if !self.hover_scale.is_finite() || self.hover_scale <= 0.0 {
            return Err(ConfigError::HoverScale(self.hover_scale));
        }
        if !self.perspective.is_finite() || self.perspective <= 0.0 {
            return Err(ConfigError::Perspective(self.perspective));
        }
        Ok(())
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_TILT_DEG, Self::DEFAULT_HOVER_SCALE)
    }
}

/// Combined configuration for a host that runs both engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub reveal: RevealConfig,
    pub tilt: TiltConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reveal.validate()?;
        self.tilt.validate()
    }
}
