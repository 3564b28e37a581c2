//! Loop controller configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CadenceError, Result};

/// Default simulation tick rate in Hz
pub const DEFAULT_TICK_RATE: f64 = 60.0;

/// Default exponential smoothing factor for the FPS estimate
pub const DEFAULT_FPS_SMOOTHING: f64 = 0.9;

/// Configuration for a loop controller
///
/// The tick rate and the fixed step are two views of the same value; the
/// setters are mutually exclusive and the last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Simulation step in seconds
    pub fixed_step: f64,
    /// Exponential smoothing factor for the FPS estimate.
    /// Higher values smooth more but react slower.
    pub fps_smoothing: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / DEFAULT_TICK_RATE,
            fps_smoothing: DEFAULT_FPS_SMOOTHING,
        }
    }
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed step from a target tick rate in Hz
    pub fn set_tick_rate(&mut self, hz: f64) -> Result<()> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(CadenceError::InvalidTickRate(hz));
        }
        self.fixed_step = 1.0 / hz;
        Ok(())
    }

    /// Set the fixed step directly, in seconds
    pub fn set_fixed_step(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(CadenceError::InvalidFixedStep(seconds));
        }
        self.fixed_step = seconds;
        Ok(())
    }

    /// Set the FPS smoothing factor, in `[0, 1]`
    pub fn set_fps_smoothing(&mut self, smoothing: f64) -> Result<()> {
        if !smoothing.is_finite() || !(0.0..=1.0).contains(&smoothing) {
            return Err(CadenceError::InvalidSmoothing(smoothing));
        }
        self.fps_smoothing = smoothing;
        Ok(())
    }

    /// The tick rate implied by the current fixed step
    pub fn tick_rate(&self) -> f64 {
        1.0 / self.fixed_step
    }

    /// Check every field, for configs built by hand or deserialized
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return Err(CadenceError::InvalidFixedStep(self.fixed_step));
        }
        if !self.fps_smoothing.is_finite() || !(0.0..=1.0).contains(&self.fps_smoothing) {
            return Err(CadenceError::InvalidSmoothing(self.fps_smoothing));
        }
        Ok(())
    }

    /// Load and validate a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoopConfig::new();
        assert!((config.fixed_step - 1.0 / 60.0).abs() < 1e-10);
        assert!((config.fps_smoothing - 0.9).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_steps() {
        let mut config = LoopConfig::new();
        assert!(config.set_fixed_step(0.0).is_err());
        assert!(config.set_fixed_step(-1.0).is_err());
        assert!(config.set_fixed_step(f64::NAN).is_err());
        assert!(config.set_tick_rate(0.0).is_err());
        assert!(config.set_tick_rate(f64::INFINITY).is_err());
        // Rejected writes leave the config untouched
        assert!((config.fixed_step - 1.0 / 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let mut config = LoopConfig::new();
        assert!(config.set_fps_smoothing(-0.1).is_err());
        assert!(config.set_fps_smoothing(1.1).is_err());
        assert!(config.set_fps_smoothing(f64::NAN).is_err());
        assert!(config.set_fps_smoothing(0.0).is_ok());
        assert!(config.set_fps_smoothing(1.0).is_ok());
    }

    #[test]
    fn test_last_write_wins() {
        let mut config = LoopConfig::new();
        config.set_tick_rate(30.0).unwrap();
        assert!((config.fixed_step - 1.0 / 30.0).abs() < 1e-10);

        config.set_fixed_step(0.01).unwrap();
        assert!((config.fixed_step - 0.01).abs() < 1e-10);
        assert!((config.tick_rate() - 100.0).abs() < 1e-6);

        config.set_tick_rate(120.0).unwrap();
        assert!((config.fixed_step - 1.0 / 120.0).abs() < 1e-10);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = LoopConfig::new();
        config.set_tick_rate(30.0).unwrap();
        config.set_fps_smoothing(0.5).unwrap();

        let text = config.to_toml().unwrap();
        let parsed: LoopConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: LoopConfig = toml::from_str("fixed_step = 0.02").unwrap();
        assert!((parsed.fixed_step - 0.02).abs() < 1e-10);
        assert!((parsed.fps_smoothing - 0.9).abs() < 1e-10);
    }
}
