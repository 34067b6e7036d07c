use sb988_core::EntityError;
use thiserror::Error;

/// Failure raised by an injected strategy (behavior, scenario, metrics,
/// population generator)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("{component} failed: {reason}")]
    Failed { component: String, reason: String },

    #[error(transparent)]
    Entity(#[from] EntityError),
}

impl StrategyError {
    pub fn failed(component: impl Into<String>, reason: impl Into<String>) -> Self {
        StrategyError::Failed {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

pub type StrategyResult<T> = std::result::Result<T, StrategyError>;

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
