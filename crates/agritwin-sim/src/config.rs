//! Configuration loading and validation for the `AgriTwin` simulation core.
//!
//! The canonical configuration lives in `agritwin-config.yaml` at the
//! working directory root. This module defines strongly-typed structs that
//! mirror the YAML structure, a loader, and the validation step that turns
//! the raw run section into a [`RunPlan`] the stepper can trust.
//!
//! Defaults match the product's simulation setup form: Field Alpha,
//! corn, 50 ha, 70% irrigation, 50% fertilization, normal climate,
//! 90 days.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use agritwin_types::{Climate, Crop, RunPlan};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A run parameter is out of its accepted range.
    #[error("invalid run configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `agritwin-config.yaml`. All fields have
/// defaults, so a missing file or empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// The simulation run parameters.
    #[serde(default)]
    pub run: RunConfig,

    /// Playback timing settings.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Frame rendering settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Raw, user-facing run parameters as they appear in the YAML file.
///
/// Validation into a [`RunPlan`] happens in [`RunConfig::validate`]; the
/// stepper never sees these raw values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Field identifier or display name.
    #[serde(default = "default_field")]
    pub field: String,

    /// Crop name (one of: corn, wheat, rice, soybean).
    #[serde(default = "default_crop")]
    pub crop: String,

    /// Field area in hectares.
    #[serde(default = "default_area_hectares")]
    pub area_hectares: f64,

    /// Irrigation level in percent of maximum water volume.
    #[serde(default = "default_irrigation_percent")]
    pub irrigation_percent: u32,

    /// Fertilization level in percent of maximum NPK dosage.
    #[serde(default = "default_fertilization_percent")]
    pub fertilization_percent: u32,

    /// Climate scenario name (one of: normal, dry, wet).
    #[serde(default = "default_climate")]
    pub climate: String,

    /// Run length in simulated days. The setup form offers 30, 60, 90,
    /// and 120, but any positive value is accepted.
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    /// Noise seed for reproducible runs. 0 means "seed from entropy".
    #[serde(default)]
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            field: default_field(),
            crop: default_crop(),
            area_hectares: default_area_hectares(),
            irrigation_percent: default_irrigation_percent(),
            fertilization_percent: default_fertilization_percent(),
            climate: default_climate(),
            duration_days: default_duration_days(),
            seed: 0,
        }
    }
}

impl RunConfig {
    /// Validate the raw parameters into a [`RunPlan`].
    ///
    /// Rejected outright: a zero duration, percentages above 100, a
    /// non-positive or non-finite area, and an unknown crop name. An
    /// unknown climate name is not an error -- it falls back to
    /// [`Climate::Normal`] with a warning, so a misspelled scenario
    /// degrades to standard weather instead of failing the run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first rejected
    /// parameter.
    pub fn validate(&self) -> Result<RunPlan, ConfigError> {
        if self.duration_days == 0 {
            return Err(ConfigError::Invalid {
                reason: "duration_days must be at least 1".to_owned(),
            });
        }

        let irrigation_percent =
            u8::try_from(self.irrigation_percent).map_err(|_err| ConfigError::Invalid {
                reason: format!(
                    "irrigation_percent must be in [0, 100], got {}",
                    self.irrigation_percent
                ),
            })?;
        let fertilization_percent =
            u8::try_from(self.fertilization_percent).map_err(|_err| ConfigError::Invalid {
                reason: format!(
                    "fertilization_percent must be in [0, 100], got {}",
                    self.fertilization_percent
                ),
            })?;
        if irrigation_percent > 100 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "irrigation_percent must be in [0, 100], got {irrigation_percent}"
                ),
            });
        }
        if fertilization_percent > 100 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "fertilization_percent must be in [0, 100], got {fertilization_percent}"
                ),
            });
        }

        if !self.area_hectares.is_finite() || self.area_hectares <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "area_hectares must be positive and finite, got {}",
                    self.area_hectares
                ),
            });
        }

        Ok(RunPlan {
            field: self.field.clone(),
            crop: parse_crop(&self.crop)?,
            area_hectares: self.area_hectares,
            irrigation_percent,
            fertilization_percent,
            climate: parse_climate(&self.climate),
            duration_days: self.duration_days,
            seed: self.seed,
        })
    }
}

/// Parse a crop name into a typed [`Crop`] value.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the name does not match a crop the
/// product supports.
fn parse_crop(name: &str) -> Result<Crop, ConfigError> {
    match name.to_lowercase().as_str() {
        "corn" | "maize" => Ok(Crop::Corn),
        "wheat" => Ok(Crop::Wheat),
        "rice" => Ok(Crop::Rice),
        "soybean" | "soy" => Ok(Crop::Soybean),
        other => Err(ConfigError::Invalid {
            reason: format!("unknown crop: {other}"),
        }),
    }
}

/// Parse a climate scenario name, defaulting to [`Climate::Normal`] for
/// unknown names.
fn parse_climate(name: &str) -> Climate {
    match name.to_lowercase().as_str() {
        "normal" => Climate::Normal,
        "dry" | "drought" => Climate::Dry,
        "wet" | "excess-rain" => Climate::Wet,
        other => {
            warn!(climate = other, "unknown climate scenario, using Normal");
            Climate::Normal
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Playback timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackConfig {
    /// Real-time milliseconds per simulated day (100 ms means a 90-day
    /// run plays back in 9 seconds).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

/// Frame rendering settings for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Whether to print rendered field frames during playback.
    #[serde(default = "default_render_enabled")]
    pub enabled: bool,

    /// Print a frame every N simulated days (0 = only the final frame).
    #[serde(default = "default_frame_every_days")]
    pub frame_every_days: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: default_render_enabled(),
            frame_every_days: default_frame_every_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingConfig
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_field() -> String {
    String::from("Field Alpha")
}

fn default_crop() -> String {
    String::from("Corn")
}

const fn default_area_hectares() -> f64 {
    50.0
}

const fn default_irrigation_percent() -> u32 {
    70
}

const fn default_fertilization_percent() -> u32 {
    50
}

fn default_climate() -> String {
    String::from("Normal")
}

const fn default_duration_days() -> u32 {
    90
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_render_enabled() -> bool {
    true
}

const fn default_frame_every_days() -> u32 {
    10
}

fn default_log_level() -> String {
    String::from("info")
}
