//! Decoder and logging configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [decoder]
//! unknown_frames = "skip"      # or "reject"
//! settings_length = "strict"   # or "truncate"
//! max_frame_size = 16384
//!
//! [logging]
//! level = "info"
//! format = "pretty"            # "compact" or "json"
//! timestamps = true
//! ```

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::frame::{DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_SIZE};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decoder.validate()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// What the dispatcher does with a frame type it has no parser for.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFramePolicy {
    /// Consume the payload and yield [`crate::Frame::Skipped`] (RFC 7540 Section 4.1).
    #[default]
    Skip,
    /// Fail with [`crate::DecodeError::UnsupportedFrameType`].
    Reject,
}

/// How a SETTINGS payload whose length is not a multiple of 6 is handled.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsLengthPolicy {
    /// Fail with [`crate::DecodeError::MalformedSettingsPayload`].
    #[default]
    Strict,
    /// Decode the complete records and drop the trailing partial one.
    Truncate,
}

/// Frame decoder configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfig {
    #[serde(default)]
    pub unknown_frames: UnknownFramePolicy,
    #[serde(default)]
    pub settings_length: SettingsLengthPolicy,
    /// Largest payload the buffering readers accept.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            unknown_frames: UnknownFramePolicy::default(),
            settings_length: SettingsLengthPolicy::default(),
            max_frame_size: default_max_frame_size(),
        }
    }
}

fn default_max_frame_size() -> u32 {
    DEFAULT_MAX_FRAME_SIZE
}

impl DecoderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(DEFAULT_MAX_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&self.max_frame_size) {
            return Err(ConfigError::Invalid(format!(
                "max_frame_size ({}) must be between {} and {}",
                self.max_frame_size, DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_SIZE
            )));
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Logging configuration for hosting processes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `h2_frame=trace`. `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            timestamps: default_timestamps(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timestamps() -> bool {
    true
}
