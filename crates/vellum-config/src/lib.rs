//! Vellum configuration
//!
//! Settings for the scene editor, loaded from `vellum.toml` with
//! environment variable overrides. Every section is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default file name looked up in the current directory.
pub const CONFIG_FILE: &str = "vellum.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VellumConfig {
    /// Pointer interaction settings
    pub interaction: InteractionConfig,
    /// Overlay and selection drawing settings
    pub rendering: RenderingConfig,
    /// Text fallbacks
    pub text: TextConfig,
    /// Log filter
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pick radius around displayed control points, in canvas pixels
    pub hit_radius: f32,
    /// Maximum deviation when flattening curves for containment tests
    pub flatten_tolerance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    /// Selection outline and corner handle color (straight RGBA, 0..1)
    pub selection_color: [f32; 4],
    /// Side length of the selection corner handles
    pub selection_handle_size: f32,
    /// Side length of control point squares in path editing
    pub control_point_size: f32,
    pub anchor_color: [f32; 4],
    pub control_color: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    /// Font size used when a run's size is mixed
    pub default_font_size: f32,
    /// Line height as a multiple of font size when a run's line height is mixed
    pub line_height_factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"vellum_editor=debug"`
    pub filter: Option<String>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hit_radius: 6.0,
            flatten_tolerance: 0.05,
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            selection_color: [0.0, 0.6, 1.0, 1.0],
            selection_handle_size: 6.0,
            control_point_size: 5.0,
            anchor_color: [0.9, 0.4, 0.0, 1.0],
            control_color: [0.4, 0.8, 0.2, 1.0],
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_font_size: 12.0,
            line_height_factor: 1.2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn env_f32(name: &str) -> Option<f32> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            warn!(var = name, value = %raw, "ignoring invalid numeric override");
            None
        }
    }
}

impl VellumConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `vellum.toml` from the current directory, or defaults if it is
    /// absent. A file that exists but fails to parse is logged and ignored.
    pub fn load_or_default() -> Self {
        Self::load_from_path_or_default(CONFIG_FILE)
    }

    pub fn load_from_path_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(err) => {
                warn!(
                    error = %err,
                    cause = ?std::error::Error::source(&err),
                    "using default configuration"
                );
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Some(radius) = env_f32("VELLUM_HIT_RADIUS") {
            self.interaction.hit_radius = radius;
        }
        if let Some(tol) = env_f32("VELLUM_FLATTEN_TOLERANCE") {
            if tol > 0.0 {
                self.interaction.flatten_tolerance = tol;
            }
        }
        if let Ok(filter) = std::env::var("VELLUM_LOG") {
            if !filter.trim().is_empty() {
                self.logging.filter = Some(filter);
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from vellum.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
