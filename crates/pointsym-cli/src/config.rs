use crate::error::{CliError, Result};
use pointsym::engine::config::{AnalysisConfig, AnalysisConfigBuilder, AnimationConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_FRAME_RATE: f64 = 30.0;
/// Upper bound on the sampling rate; keeps the frame interval well above zero.
pub const MAX_FRAME_RATE: f64 = 1000.0;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialAnalysisConfig {
    geometry_tolerance: Option<f64>,
    numeric_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialAnimationConfig {
    duration_seconds: Option<f64>,
    frame_rate: Option<f64>,
}

/// Settings read from an optional TOML file; every key may be omitted.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialConfig {
    #[serde(default)]
    analysis: PartialAnalysisConfig,
    #[serde(default)]
    animation: PartialAnimationConfig,
}

/// Animation timing plus the rate at which frames are sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub animation: AnimationConfig,
    pub frame_rate: f64,
}

impl PlaybackConfig {
    /// Time between two sampled frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file if one was given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Merges the file with a command-line geometry tolerance; the command line wins.
    pub fn analysis_config(&self, tolerance: Option<f64>) -> Result<AnalysisConfig> {
        let mut builder = AnalysisConfigBuilder::new();
        if let Some(t) = tolerance.or(self.analysis.geometry_tolerance) {
            builder = builder.geometry_tolerance(t);
        }
        if let Some(t) = self.analysis.numeric_tolerance {
            builder = builder.numeric_tolerance(t);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn playback_config(&self, frame_rate: Option<f64>) -> Result<PlaybackConfig> {
        let animation = match self.animation.duration_seconds {
            Some(seconds) => {
                AnimationConfig::from_seconds(seconds).map_err(|e| CliError::Config(e.to_string()))?
            }
            None => AnimationConfig::default(),
        };
        let frame_rate = frame_rate
            .or(self.animation.frame_rate)
            .unwrap_or(DEFAULT_FRAME_RATE);
        if !(frame_rate > 0.0 && frame_rate <= MAX_FRAME_RATE) {
            return Err(CliError::Config(format!(
                "Frame rate must be in (0, {MAX_FRAME_RATE}] fps, got {frame_rate}"
            )));
        }
        Ok(PlaybackConfig {
            animation,
            frame_rate,
        })
    }
}
