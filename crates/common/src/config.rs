//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recognition pipeline defaults.
    pub pipeline: PipelineDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default recognition pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefaults {
    /// Side length of the square region cropped from the frame center.
    pub crop_size: u32,

    /// Summed-channel darkness threshold below which a pixel counts as ink.
    pub ink_threshold: u16,

    /// Side length the cropped digit is downscaled to.
    pub content_size: u32,

    /// Side length of the canvas handed to the classifier.
    pub canvas_size: u32,

    /// Maximum number of concurrently in-flight classifications.
    /// Frames arriving while at the limit are dropped, not queued.
    pub max_in_flight: usize,

    /// What the display sink receives.
    pub display_mode: DisplayMode,
}

/// What a display sink is fed per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// All ten per-digit confidences.
    Confidences,
    /// Only the arg-max digit and its confidence.
    TopDigit,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "digitlens=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PipelineDefaults {
    fn default() -> Self {
        Self {
            crop_size: 323,
            ink_threshold: 100,
            content_size: 20,
            canvas_size: 28,
            max_in_flight: 1,
            display_mode: DisplayMode::Confidences,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("digitlens").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_geometry() {
        let defaults = PipelineDefaults::default();
        assert_eq!(defaults.crop_size, 323);
        assert_eq!(defaults.ink_threshold, 100);
        assert_eq!(defaults.content_size, 20);
        assert_eq!(defaults.canvas_size, 28);
        assert_eq!(defaults.max_in_flight, 1);
    }

    #[test]
    fn display_mode_round_trips_as_snake_case() {
        let json = serde_json::to_string(&DisplayMode::TopDigit).unwrap();
        assert_eq!(json, "\"top_digit\"");
        let mode: DisplayMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, DisplayMode::TopDigit);
    }
}
