//! Sequence and run configuration.
//!
//! Settings can be loaded from a TOML file with `[model]`, `[sequence]`
//! and `[output]` tables; missing tables and fields take defaults.

use crate::difference::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a synthetic image sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames to process, including the seed frame.
    pub frame_count: u32,
    /// Seed for the noise generator.
    pub seed: u64,
    /// Side of the moving square in pixels.
    pub object_size: u32,
    /// Horizontal displacement of the square per frame.
    pub object_speed: u32,
    /// Maximum per-channel noise amplitude (0 disables noise).
    pub noise: u8,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            frame_count: 30,
            seed: 0,
            object_size: 32,
            object_speed: 4,
            noise: 0,
        }
    }
}

impl SequenceConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            object_size: width.min(height) / 4,
            ..Default::default()
        }
    }

    /// Validates the sequence parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.object_size > self.width || self.object_size > self.height {
            return Err(ConfigError::ObjectTooLarge {
                size: self.object_size,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// `frame_count` is zero.
    #[error("frame count must be greater than 0")]
    InvalidFrameCount,
    /// The moving object is zero-sized or larger than the frame.
    #[error("object size {size} does not fit in the frame")]
    ObjectTooLarge {
        /// Configured object edge length.
        size: u32,
    },
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run until interrupted (true) or process `frame_count` frames (false).
    pub continuous: bool,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            metrics_port: 9090,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[model]` table.
    #[serde(default)]
    pub model: ModelConfig,
    /// `[sequence]` table.
    #[serde(default)]
    pub sequence: SequenceConfig,
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without validating it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the combined configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sequence.validate()?;
        if self.sequence.frame_count == 0 && !self.output.continuous {
            return Err(ConfigError::InvalidFrameCount);
        }
        Ok(())
    }
}
