//! SB 988 Simulation Engine
//!
//! Owns the freelancer, client and contract population for a run and
//! advances it in fixed time steps. Behavioral models, regulatory
//! scenarios, metrics collection and population generation are injected
//! through the ports crate; the engine only orchestrates them in a fixed
//! phase order, records market snapshots and checks for convergence.
//!
//! ```no_run
//! use sb988_engine::{SimulationEngine, SyntheticPopulation};
//! use sb988_ports::SimulationConfig;
//!
//! let config = SimulationConfig::from_file("config.json")?;
//! let mut engine = SimulationEngine::new(config)?;
//! engine.set_population_generator(SyntheticPopulation::new());
//!
//! let results = engine.run()?;
//! println!("{}", results.to_json_pretty()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregates;
mod engine;
pub mod error;
pub mod metrics;
mod population;
pub mod results;

pub use aggregates::{
    CONVERGENCE_WINDOW, average_hourly_rate, compliance_rate, has_converged,
    population_variance, transaction_volume_on,
};
pub use engine::SimulationEngine;
pub use error::{SimulationError, SimulationResult, StepPhase};
pub use metrics::{
    ComplianceCounts, ContractStatusCounts, MetricsSummary, StepMetrics, StepMetricsCollector,
};
pub use population::SyntheticPopulation;
pub use results::{EntitySnapshot, ExecutionSummary, PopulationCounts, SimulationResults};
