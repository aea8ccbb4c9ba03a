// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from `biomotion.yaml` in the working directory. Every
//! field is optional; anything missing keeps its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default settings file name.
pub const CONFIG_FILE: &str = "biomotion.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_width: f32,
    pub window_height: f32,
    /// Marker and pen colours as `#rrggbb`; the first is selected at start.
    pub palette: Vec<String>,
    pub brush_sizes: Vec<f32>,
    pub default_brush_size: f32,
    /// Viewport width below which placing a marker pauses playback first.
    pub compact_width: f32,
    /// Nominal playback speeds offered in the toolbar.
    pub speeds: Vec<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 800.0,
            palette: ["#ef4444", "#22c55e", "#3b82f6", "#f59e0b", "#ffffff"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            brush_sizes: vec![2.0, 4.0, 8.0],
            default_brush_size: 4.0,
            compact_width: 768.0,
            speeds: vec![0.25, 0.5, 1.0, 1.5, 2.0],
        }
    }
}

impl AppConfig {
    /// Parse settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load settings, falling back to defaults when the file is absent or bad.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Colour selected at start.
    pub fn default_color(&self) -> String {
        self.palette
            .first()
            .cloned()
            .unwrap_or_else(|| crate::util::color::to_hex(crate::util::color::FALLBACK_COLOR))
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.palette
            .retain(|c| crate::util::color::parse_hex(c).is_some());
        if self.palette.is_empty() {
            self.palette = defaults.palette;
        }
        self.brush_sizes.retain(|s| s.is_finite() && *s > 0.0);
        if self.brush_sizes.is_empty() {
            self.brush_sizes = defaults.brush_sizes;
        }
        if !(self.default_brush_size.is_finite() && self.default_brush_size > 0.0) {
            self.default_brush_size = defaults.default_brush_size;
        }
        self.speeds.retain(|s| s.is_finite() && *s > 0.0);
        if self.speeds.is_empty() {
            self.speeds = defaults.speeds;
        }
        self
    }
}
