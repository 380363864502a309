//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. YAML files or strings
//! 2. Environment variables (with `QSIM_` prefix)
//!
//! Environment variables override file values when both are used via
//! [`SimulatorConfig::with_env_overrides`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use qsim_core::DEFAULT_TOLERANCE;

use crate::error::{DeviceError, DeviceResult};
use crate::register::MAX_CAPACITY;

/// Settings for a [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of qubits in the register.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Seed for the measurement RNG. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Tolerance for norm and probability checks.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_capacity() -> usize {
    3
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            seed: None,
            tolerance: default_tolerance(),
        }
    }
}

impl SimulatorConfig {
    /// Config with the given capacity and defaults elsewhere.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> DeviceResult<Self> {
        let config: SimulatorConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| DeviceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DeviceResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DeviceError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults overridden by environment variables.
    ///
    /// - `QSIM_CAPACITY`: number of qubits
    /// - `QSIM_SEED`: RNG seed
    /// - `QSIM_TOLERANCE`: numerical tolerance
    pub fn from_env() -> DeviceResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `QSIM_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> DeviceResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> DeviceResult<Self> {
        if let Some(capacity) = lookup("QSIM_CAPACITY") {
            self.capacity = parse_var("QSIM_CAPACITY", &capacity)?;
        }
        if let Some(seed) = lookup("QSIM_SEED") {
            self.seed = Some(parse_var("QSIM_SEED", &seed)?);
        }
        if let Some(tolerance) = lookup("QSIM_TOLERANCE") {
            self.tolerance = parse_var("QSIM_TOLERANCE", &tolerance)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> DeviceResult<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(DeviceError::InvalidConfig(format!(
                "capacity must be in 1..={MAX_CAPACITY}, got {}",
                self.capacity
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1e-3) {
            return Err(DeviceError::InvalidConfig(format!(
                "tolerance must be in (0, 1e-3), got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> DeviceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DeviceError::Config(format!("{key}: cannot parse {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = SimulatorConfig::from_yaml_str("capacity: 5\nseed: 42\n").unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.seed, Some(42));
        assert!((config.tolerance - DEFAULT_TOLERANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_yaml_rejects_out_of_range() {
        assert!(matches!(
            SimulatorConfig::from_yaml_str("capacity: 0"),
            Err(DeviceError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulatorConfig::from_yaml_str("capacity: [1, 2]"),
            Err(DeviceError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [("QSIM_CAPACITY", "4"), ("QSIM_SEED", " 7 ")].into();
        let config = SimulatorConfig::default()
            .with_overrides(|k| vars.get(k).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.capacity, 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_override_parse_error() {
        let result =
            SimulatorConfig::default().with_overrides(|k| (k == "QSIM_TOLERANCE").then(|| "tiny".to_string()));
        assert!(matches!(result, Err(DeviceError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimulatorConfig::from_file("/nonexistent/qsim.yaml"),
            Err(DeviceError::Config(_))
        ));
    }
}
