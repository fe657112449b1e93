use std::time::Duration;
use thiserror::Error;

/// Distance, in Angstroms, within which an operated atom must land on an equivalent atom.
pub const DEFAULT_GEOMETRY_TOLERANCE: f64 = 1e-3;
/// Allowed distance of a reduction-formula result from a non-negative integer.
pub const DEFAULT_NUMERIC_TOLERANCE: f64 = 1e-6;
/// Length of one full play-and-reverse animation cycle.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(1500);

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{name}' must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Tolerances of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub geometry_tolerance: f64,
    pub numeric_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            geometry_tolerance: DEFAULT_GEOMETRY_TOLERANCE,
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    geometry_tolerance: Option<f64>,
    numeric_tolerance: Option<f64>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry_tolerance(mut self, tolerance: f64) -> Self {
        self.geometry_tolerance = Some(tolerance);
        self
    }
    pub fn numeric_tolerance(mut self, tolerance: f64) -> Self {
        self.numeric_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        Ok(AnalysisConfig {
            geometry_tolerance: positive(
                "geometry_tolerance",
                self.geometry_tolerance
                    .unwrap_or(DEFAULT_GEOMETRY_TOLERANCE),
            )?,
            numeric_tolerance: positive(
                "numeric_tolerance",
                self.numeric_tolerance.unwrap_or(DEFAULT_NUMERIC_TOLERANCE),
            )?,
        })
    }
}

/// Timing of the operation animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub duration: Duration,
}

impl AnimationConfig {
    pub fn new(duration: Duration) -> Result<Self, ConfigError> {
        positive("duration", duration.as_secs_f64())?;
        Ok(Self { duration })
    }

    pub fn from_seconds(seconds: f64) -> Result<Self, ConfigError> {
        let seconds = positive("duration", seconds)?;
        Ok(Self {
            duration: Duration::from_secs_f64(seconds),
        })
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let config = AnalysisConfigBuilder::new().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.geometry_tolerance, 1e-3);
        assert_eq!(config.numeric_tolerance, 1e-6);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = AnalysisConfigBuilder::new()
            .geometry_tolerance(0.01)
            .numeric_tolerance(1e-4)
            .build()
            .unwrap();
        assert_eq!(config.geometry_tolerance, 0.01);
        assert_eq!(config.numeric_tolerance, 1e-4);
    }

    #[test]
    fn builder_rejects_non_positive_tolerances() {
        assert_eq!(
            AnalysisConfigBuilder::new().geometry_tolerance(0.0).build(),
            Err(ConfigError::InvalidParameter {
                name: "geometry_tolerance",
                value: 0.0
            })
        );
        assert!(
            AnalysisConfigBuilder::new()
                .numeric_tolerance(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn animation_duration_defaults_and_validation() {
        assert_eq!(
            AnimationConfig::default().duration,
            Duration::from_secs_f64(1.5)
        );
        assert_eq!(
            AnimationConfig::from_seconds(2.0).unwrap().duration,
            Duration::from_secs(2)
        );
        assert!(AnimationConfig::from_seconds(-1.0).is_err());
        assert!(AnimationConfig::new(Duration::ZERO).is_err());
    }
}
