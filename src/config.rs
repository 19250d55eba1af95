use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Editor settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Time between playback ticks (100 ms = 10 frames per second)
    pub playback_interval_ms: u64,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Offset applied to duplicated strokes
    pub duplicate_offset: [f32; 2],
    /// Alpha of the onion-skin tint for the previous frame
    pub onion_skin_opacity: f32,
    /// Oldest undo entries are dropped beyond this many; `None` keeps everything
    pub history_limit: Option<usize>,
    pub recent_colors_capacity: usize,
    /// Width of one timeline cell, used by scrubbing and hold-run dragging
    pub timeline_cell_width: f32,
    /// Multi-finger taps longer than this are not taps
    pub tap_max_duration_ms: u64,
    /// Multi-finger taps that travel further than this are not taps
    pub tap_max_travel: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 1000.0,
            playback_interval_ms: 100,
            min_scale: 0.1,
            max_scale: 10.0,
            duplicate_offset: [20.0, 20.0],
            onion_skin_opacity: 0.2,
            history_limit: None,
            recent_colors_capacity: 10,
            timeline_cell_width: 40.0,
            tap_max_duration_ms: 250,
            tap_max_travel: 10.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "scale range {}..={} is empty",
                self.min_scale, self.max_scale
            )));
        }
        if self.playback_interval_ms == 0 {
            return Err(ConfigError::Invalid("playback interval must be non-zero".to_string()));
        }
        if self.timeline_cell_width <= 0.0 {
            return Err(ConfigError::Invalid("timeline cell width must be positive".to_string()));
        }
        Ok(())
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }
}
