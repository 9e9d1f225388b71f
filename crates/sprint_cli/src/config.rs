//! Sprint configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default file name looked up in the working directory
pub const CONFIG_FILE: &str = "sprint.toml";

/// Top-level Sprint configuration (sprint.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SprintConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Headless playback settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Fixed tick rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Simulated seconds to run
    #[serde(default = "default_seconds")]
    pub seconds: f32,
    /// Button clicks to simulate once the intro has settled
    #[serde(default = "default_clicks")]
    pub clicks: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_seconds() -> f32 {
    12.0
}

fn default_clicks() -> u32 {
    3
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seconds: default_seconds(),
            clicks: default_clicks(),
        }
    }
}

/// Size of the simulated scene
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    600.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl SprintConfig {
    /// Load configuration from an explicit file. The file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load sprint.toml from a directory, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SprintConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the playback loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.playback.fps == 0 {
            anyhow::bail!("playback.fps must be at least 1");
        }
        if !self.playback.seconds.is_finite() || self.playback.seconds < 0.0 {
            anyhow::bail!(
                "playback.seconds must be a non-negative number, got {}",
                self.playback.seconds
            );
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            anyhow::bail!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
