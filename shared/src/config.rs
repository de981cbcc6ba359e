use std::time::Duration;

use serde::Deserialize;

use crate::error::FleetError;
use crate::types::Severity;

/// Deviation distance thresholds, all in meters.
///
/// `trigger_m` decides whether a deviation exists at all; `medium_m` and
/// `high_m` classify how bad it is. They are independent knobs, so
/// `validate` enforces `trigger_m <= medium_m <= high_m` at startup instead
/// of trusting the deployment to keep them consistent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DeviationThresholds {
    pub trigger_m: f64,
    pub medium_m: f64,
    pub high_m: f64,
}

impl Default for DeviationThresholds {
    fn default() -> Self {
        Self {
            trigger_m: 200.0,
            medium_m: 500.0,
            high_m: 1000.0,
        }
    }
}

impl DeviationThresholds {
    /// Classifies a deviation distance, checked high-to-low so a distance
    /// past `high_m` is never reported as Medium.
    pub fn severity_for(&self, distance_m: f64) -> Severity {
        if distance_m > self.high_m {
            Severity::High
        } else if distance_m > self.medium_m {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        if self.trigger_m <= 0.0 || self.medium_m <= 0.0 || self.high_m <= 0.0 {
            return Err(FleetError::InvalidConfig(
                "deviation thresholds must be positive".into(),
            ));
        }
        if self.trigger_m > self.medium_m || self.medium_m > self.high_m {
            return Err(FleetError::InvalidConfig(format!(
                "deviation thresholds must satisfy trigger <= medium <= high \
                 (got {} / {} / {})",
                self.trigger_m, self.medium_m, self.high_m
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FleetConfig {
    /// How long a cached position stays fresh, in seconds. A single explicit
    /// knob; the magnitude is a product decision, not a derived constant.
    pub position_ttl_secs: u64,
    pub thresholds: DeviationThresholds,
    pub nats_url: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            position_ttl_secs: 1800,
            thresholds: DeviationThresholds::default(),
            nats_url: "nats://127.0.0.1:4222".into(),
        }
    }
}

impl FleetConfig {
    /// Loads configuration from defaults, an optional `fleetwatch.toml`, and
    /// `FLEETWATCH_*` environment overrides, then validates it.
    pub fn load() -> Result<Self, FleetError> {
        let defaults = Self::default();
        let cfg = ::config::Config::builder()
            .set_default("position_ttl_secs", defaults.position_ttl_secs)
            .and_then(|b| b.set_default("thresholds.trigger_m", defaults.thresholds.trigger_m))
            .and_then(|b| b.set_default("thresholds.medium_m", defaults.thresholds.medium_m))
            .and_then(|b| b.set_default("thresholds.high_m", defaults.thresholds.high_m))
            .and_then(|b| b.set_default("nats_url", defaults.nats_url.as_str()))
            .map_err(|e| FleetError::InvalidConfig(e.to_string()))?
            .add_source(::config::File::with_name("fleetwatch").required(false))
            .add_source(::config::Environment::with_prefix("FLEETWATCH").separator("__"))
            .build()
            .map_err(|e| FleetError::InvalidConfig(e.to_string()))?;

        let cfg: FleetConfig = cfg
            .try_deserialize()
            .map_err(|e| FleetError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn position_ttl(&self) -> Duration {
        Duration::from_secs(self.position_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        if self.position_ttl_secs == 0 {
            return Err(FleetError::InvalidConfig(
                "position_ttl_secs must be nonzero".into(),
            ));
        }
        self.thresholds.validate()
    }
}
