//! SB 988 Ports
//!
//! Port definitions (traits) for the simulator. These are the seams the
//! engine is specialized through without being rewritten: population
//! generation, behavioral models, regulatory scenarios and metrics
//! collection. The configuration surface lives here too, since every
//! collaborator reads it.

mod behavior;
mod clock;
mod config;
mod error;
mod metrics;
mod population;
mod scenario;

pub use behavior::{
    ClientBehavior, FreelancerBehavior, MarketDynamics, NoOpBehavior, SimRng, StepContext,
};
pub use clock::Clock;
pub use config::{SimulationConfig, duration_secs};
pub use error::{ConfigError, ConfigResult, StrategyError, StrategyResult};
pub use metrics::MetricsCollector;
pub use population::{
    Clients, Contracts, EmptyPopulation, Freelancers, Population, PopulationGenerator,
    PopulationView,
};
pub use scenario::{ActivationWindow, Scenario, ScenarioReport, WindowedScenario};
