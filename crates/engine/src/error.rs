//! Engine errors

use sb988_core::{ClientId, ContractId, EntityError, FreelancerId, Timestamp};
use sb988_ports::{ConfigError, StrategyError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Phase of the engine in which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StepPhase {
    Initialization,
    MarketConditions,
    AgentBehaviors,
    ContractLifecycle,
    RegulatoryScenarios,
    MetricsCollection,
}

impl std::fmt::Display for StepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepPhase::Initialization => "initialization",
            StepPhase::MarketConditions => "market conditions",
            StepPhase::AgentBehaviors => "agent behaviors",
            StepPhase::ContractLifecycle => "contract lifecycle",
            StepPhase::RegulatoryScenarios => "regulatory scenarios",
            StepPhase::MetricsCollection => "metrics collection",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{phase} phase failed: {source}")]
    Strategy {
        phase: StepPhase,
        #[source]
        source: StrategyError,
    },

    #[error("Invalid entity {id}: {source}")]
    InvalidEntity {
        id: Uuid,
        #[source]
        source: EntityError,
    },

    #[error("Duplicate entity id: {0}")]
    DuplicateId(Uuid),

    #[error("Unknown freelancer: {0}")]
    UnknownFreelancer(FreelancerId),

    #[error("Unknown client: {0}")]
    UnknownClient(ClientId),

    #[error("Unknown contract: {0}")]
    UnknownContract(ContractId),

    #[error("Clock overflow advancing {step_secs}s past {now}")]
    ClockOverflow { now: Timestamp, step_secs: i64 },

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

impl SimulationError {
    pub(crate) fn strategy(phase: StepPhase) -> impl FnOnce(StrategyError) -> Self {
        move |source| SimulationError::Strategy { phase, source }
    }

    pub(crate) fn invalid(id: Uuid) -> impl FnOnce(EntityError) -> Self {
        move |source| SimulationError::InvalidEntity { id, source }
    }
}

pub type SimulationResult<T> = std::result::Result<T, SimulationError>;
