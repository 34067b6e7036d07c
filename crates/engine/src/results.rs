//! Results aggregate returned by a completed run

use sb988_core::{Client, Contract, Freelancer, MarketSnapshot, Timestamp, Transaction};
use sb988_ports::{Population, ScenarioReport, SimulationConfig};
use serde::Serialize;

/// Final entity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulationCounts {
    pub freelancers: usize,
    pub clients: usize,
    pub contracts: usize,
    pub transactions: usize,
}

impl PopulationCounts {
    pub fn of(population: &Population, transactions: &[Transaction]) -> Self {
        Self {
            freelancers: population.freelancers.len(),
            clients: population.clients.len(),
            contracts: population.contracts.len(),
            transactions: transactions.len(),
        }
    }
}

/// How the run went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    pub start_time: Timestamp,
    /// Simulated time after the last step, one step past the last snapshot
    pub end_time: Timestamp,
    pub total_steps: u64,
    /// Whether the run stopped early on the convergence check
    pub converged: bool,
    pub final_population: PopulationCounts,
}

/// Final entity collections as value lists, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub freelancers: Vec<Freelancer>,
    pub clients: Vec<Client>,
    pub contracts: Vec<Contract>,
    pub transactions: Vec<Transaction>,
}

impl EntitySnapshot {
    pub fn from_population(population: Population, transactions: Vec<Transaction>) -> Self {
        Self {
            freelancers: population.freelancers.into_values().collect(),
            clients: population.clients.into_values().collect(),
            contracts: population.contracts.into_values().collect(),
            transactions,
        }
    }
}

/// Read-only record of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults<S> {
    pub config: SimulationConfig,
    pub execution_summary: ExecutionSummary,
    pub market_evolution: Vec<MarketSnapshot>,
    pub metrics: S,
    pub scenario_results: Vec<ScenarioReport>,
    pub entities: EntitySnapshot,
}

impl<S: Serialize> SimulationResults<S> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<S> SimulationResults<S> {
    /// Last market snapshot of the run, if any step executed
    pub fn final_snapshot(&self) -> Option<&MarketSnapshot> {
        self.market_evolution.last()
    }
}
