use gravity::Units;
use multistep::{MAX_ORDER, MultistepSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RocketErrors;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigErrors {
    #[error("dt cannot be less than or equal to 0")]
    DtCantBeZero,
    #[error("history limit {0} cannot hold the samples of the max order")]
    InvalidHistoryLimit(usize),
    #[error("max order must be between 1 and 4, got {0}")]
    InvalidMaxOrder(usize),
    #[error("tstart cannot be greater than tstop")]
    StartGreaterThanStop,
}

/// Run options. Every field has a default, so a RON file only needs the ones
/// it changes:
///
/// ```text
/// (name: "hop", tstop: 5.0, dt: 0.01, multistep: (max_order: 3))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub name: String,
    pub tstart: f64,
    pub tstop: f64,
    pub dt: f64,
    pub units: Units,
    pub multistep: MultistepSettings,
    /// Rescale each attitude to unit length after every step.
    pub renormalize_attitude: bool,
    /// Seed for random disturbance models.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: "simulation".to_string(),
            tstart: 0.0,
            tstop: 10.0,
            dt: 0.01,
            units: Units::default(),
            multistep: MultistepSettings::default(),
            renormalize_attitude: true,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new(name: &str, tstart: f64, tstop: f64, dt: f64) -> Result<Self, ConfigErrors> {
        let config = Self {
            name: name.to_string(),
            tstart,
            tstop,
            dt,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_multistep(mut self, multistep: MultistepSettings) -> Self {
        self.multistep = multistep;
        self
    }

    pub fn with_renormalize_attitude(mut self, renormalize_attitude: bool) -> Self {
        self.renormalize_attitude = renormalize_attitude;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parses and validates a RON document.
    pub fn from_ron(s: &str) -> Result<Self, RocketErrors> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigErrors> {
        if self.tstart > self.tstop {
            return Err(ConfigErrors::StartGreaterThanStop);
        }
        if !self.dt.is_finite() || self.dt < f64::EPSILON {
            return Err(ConfigErrors::DtCantBeZero);
        }
        if self.multistep.max_order == 0 || self.multistep.max_order > MAX_ORDER {
            return Err(ConfigErrors::InvalidMaxOrder(self.multistep.max_order));
        }
        if let Some(limit) = self.multistep.history_limit {
            if limit < self.multistep.max_order {
                return Err(ConfigErrors::InvalidHistoryLimit(limit));
            }
        }
        Ok(())
    }

    /// Number of whole steps from `tstart` to `tstop`.
    pub fn steps(&self) -> usize {
        ((self.tstop - self.tstart) / self.dt).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.steps(), 1000);
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            SimulationConfig::new("a", 0.0, 1.0, 0.0),
            Err(ConfigErrors::DtCantBeZero)
        );
        assert_eq!(
            SimulationConfig::new("a", 2.0, 1.0, 0.1),
            Err(ConfigErrors::StartGreaterThanStop)
        );
        assert_eq!(SimulationConfig::new("a", 0.0, 1.0, 0.1).unwrap().steps(), 10);
    }

    #[test]
    fn test_from_ron() {
        let config = SimulationConfig::from_ron(
            r#"(name: "hop", tstop: 5.0, dt: 0.01, units: English, multistep: (max_order: 3), seed: 42)"#,
        )
        .unwrap();
        assert_eq!(config.name, "hop");
        assert_eq!(config.tstart, 0.0);
        assert_eq!(config.units, Units::English);
        assert_eq!(config.multistep.max_order, 3);
        assert_eq!(config.seed, 42);
        assert!(config.renormalize_attitude);
        assert_eq!(config.steps(), 500);
    }

    #[test]
    fn test_from_ron_rejects_bad_values() {
        assert!(matches!(
            SimulationConfig::from_ron("(dt: -1.0)"),
            Err(RocketErrors::Config(ConfigErrors::DtCantBeZero))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(multistep: (max_order: 7))"),
            Err(RocketErrors::Config(ConfigErrors::InvalidMaxOrder(7)))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(multistep: (max_order: 4, history_limit: Some(0)))"),
            Err(RocketErrors::Config(ConfigErrors::InvalidHistoryLimit(0)))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(multistep: (max_order: 3, history_limit: Some(2)))"),
            Err(RocketErrors::Config(ConfigErrors::InvalidHistoryLimit(2)))
        ));
        assert!(SimulationConfig::from_ron("(multistep: (max_order: 3, history_limit: Some(3)))").is_ok());
        assert!(matches!(
            SimulationConfig::from_ron("(dt: "),
            Err(RocketErrors::Ron(_))
        ));
    }
}
