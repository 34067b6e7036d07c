use thiserror::Error;

use crate::ContractStatus;

/// Construction and mutation errors for domain entities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    #[error("Invalid {kind}: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid contract transition: {from} -> {to}")]
    InvalidTransition {
        from: ContractStatus,
        to: ContractStatus,
    },
}

pub type EntityResult<T> = std::result::Result<T, EntityError>;
