//! Simulation configuration
//!
//! Loaded from JSON. Only the time window is required; every other option
//! falls back to its documented default.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sb988_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::scenario::ActivationWindow;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // Time parameters
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Fixed step between iterations, serialized as whole seconds
    #[serde(default = "default_time_step", with = "duration_secs")]
    pub time_step: Duration,

    // Population parameters (consumed by the population generator)
    #[serde(default = "default_initial_freelancers")]
    pub initial_freelancers: usize,
    #[serde(default = "default_initial_clients")]
    pub initial_clients: usize,

    // Market parameters
    #[serde(default = "default_market_volatility")]
    pub market_volatility: f64,
    #[serde(default = "default_enforcement_level")]
    pub regulatory_enforcement_level: f64,

    // Behavioral parameters
    #[serde(default = "default_interaction_probability")]
    pub agent_interaction_probability: f64,
    #[serde(default = "default_contract_formation_rate")]
    pub contract_formation_rate: f64,

    // Economic parameters
    #[serde(default = "default_base_hourly_rate")]
    pub base_hourly_rate: Decimal,
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,

    // Compliance parameters
    #[serde(default)]
    pub sb988_enforcement_date: Option<Timestamp>,
    #[serde(default = "default_grace_period_days")]
    pub compliance_grace_period_days: u32,

    // Run control
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
}

fn default_time_step() -> Duration {
    Duration::days(1)
}

fn default_initial_freelancers() -> usize {
    1000
}

fn default_initial_clients() -> usize {
    500
}

fn default_market_volatility() -> f64 {
    0.1
}

fn default_enforcement_level() -> f64 {
    0.5
}

fn default_interaction_probability() -> f64 {
    0.1
}

fn default_contract_formation_rate() -> f64 {
    0.05
}

fn default_base_hourly_rate() -> Decimal {
    dec!(50)
}

fn default_inflation_rate() -> f64 {
    0.03
}

fn default_grace_period_days() -> u32 {
    90
}

fn default_max_iterations() -> u64 {
    10_000
}

fn default_convergence_threshold() -> f64 {
    0.001
}

impl SimulationConfig {
    /// Create a configuration for the given window with every other option
    /// at its default
    pub fn new(start_date: Timestamp, end_date: Timestamp) -> Self {
        Self {
            start_date,
            end_date,
            time_step: default_time_step(),
            initial_freelancers: default_initial_freelancers(),
            initial_clients: default_initial_clients(),
            market_volatility: default_market_volatility(),
            regulatory_enforcement_level: default_enforcement_level(),
            agent_interaction_probability: default_interaction_probability(),
            contract_formation_rate: default_contract_formation_rate(),
            base_hourly_rate: default_base_hourly_rate(),
            inflation_rate: default_inflation_rate(),
            sb988_enforcement_date: None,
            compliance_grace_period_days: default_grace_period_days(),
            random_seed: None,
            max_iterations: default_max_iterations(),
            convergence_threshold: default_convergence_threshold(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field and range constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.end_date < self.start_date {
            return Err(ConfigError::Invalid {
                field: "end_date",
                reason: format!("{} is before start_date {}", self.end_date, self.start_date),
            });
        }

        if self.time_step <= Duration::zero() {
            return Err(ConfigError::Invalid {
                field: "time_step",
                reason: "must be positive".to_string(),
            });
        }

        // The last step may start on end_date and still advances the clock
        if self.end_date.checked_add_signed(self.time_step).is_none() {
            return Err(ConfigError::Invalid {
                field: "time_step",
                reason: format!(
                    "{}s past end_date {} is not a representable time",
                    self.time_step.num_seconds(),
                    self.end_date
                ),
            });
        }

        for (field, value) in [
            ("market_volatility", self.market_volatility),
            ("regulatory_enforcement_level", self.regulatory_enforcement_level),
            ("agent_interaction_probability", self.agent_interaction_probability),
            ("contract_formation_rate", self.contract_formation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }

        if self.base_hourly_rate < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "base_hourly_rate",
                reason: "must not be negative".to_string(),
            });
        }

        if !self.inflation_rate.is_finite() {
            return Err(ConfigError::Invalid {
                field: "inflation_rate",
                reason: "must be finite".to_string(),
            });
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "convergence_threshold",
                reason: "must be a non-negative number".to_string(),
            });
        }

        Ok(())
    }

    /// Window in which enforcement applies: opens once the grace period
    /// after the enforcement date has elapsed, never closes
    pub fn enforcement_window(&self) -> Option<ActivationWindow> {
        self.sb988_enforcement_date.map(|date| {
            ActivationWindow::from_enforcement(date, self.compliance_grace_period_days)
        })
    }
}

/// Serde adapter storing a `chrono::Duration` as whole seconds
pub mod duration_secs {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| D::Error::custom(format!("duration of {secs}s is out of range")))
    }
}
