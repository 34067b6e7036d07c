//! Entity collections and the population-generation port

use indexmap::IndexMap;
use sb988_core::{
    Client, ClientId, Contract, ContractId, Freelancer, FreelancerId, Transaction,
};

use crate::behavior::SimRng;
use crate::config::SimulationConfig;
use crate::error::StrategyResult;

/// Freelancers keyed by id, in insertion order
pub type Freelancers = IndexMap<FreelancerId, Freelancer>;
/// Clients keyed by id, in insertion order
pub type Clients = IndexMap<ClientId, Client>;
/// Contracts keyed by id, in insertion order
pub type Contracts = IndexMap<ContractId, Contract>;

/// The mutable entity mappings owned by the engine
///
/// Insertion order is iteration order, which keeps seeded runs
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    pub freelancers: Freelancers,
    pub clients: Clients,
    pub contracts: Contracts,
}

impl Population {
    /// Insert a freelancer, returning any entity previously stored under
    /// the same id
    pub fn insert_freelancer(&mut self, freelancer: Freelancer) -> Option<Freelancer> {
        self.freelancers.insert(freelancer.id(), freelancer)
    }

    /// Insert a client, returning any entity previously stored under the
    /// same id
    pub fn insert_client(&mut self, client: Client) -> Option<Client> {
        self.clients.insert(client.id(), client)
    }

    /// Insert a contract, returning any entity previously stored under the
    /// same id
    pub fn insert_contract(&mut self, contract: Contract) -> Option<Contract> {
        self.contracts.insert(contract.id(), contract)
    }

    /// Number of contracts currently in ACTIVE status
    pub fn active_contracts(&self) -> usize {
        self.contracts.values().filter(|c| c.is_active()).count()
    }

    /// Returns true if no freelancers, clients or contracts exist
    pub fn is_empty(&self) -> bool {
        self.freelancers.is_empty() && self.clients.is_empty() && self.contracts.is_empty()
    }
}

/// Read-only view of everything the engine owns, lent to observers
#[derive(Debug, Clone, Copy)]
pub struct PopulationView<'a> {
    pub freelancers: &'a Freelancers,
    pub clients: &'a Clients,
    pub contracts: &'a Contracts,
    pub transactions: &'a [Transaction],
}

impl<'a> PopulationView<'a> {
    pub fn new(population: &'a Population, transactions: &'a [Transaction]) -> Self {
        Self {
            freelancers: &population.freelancers,
            clients: &population.clients,
            contracts: &population.contracts,
            transactions,
        }
    }
}

/// Port for filling the initial population before the first step
///
/// How many entities and with what distributions is entirely up to the
/// implementation; the engine only requires well-formed entities.
pub trait PopulationGenerator {
    fn populate(
        &mut self,
        config: &SimulationConfig,
        population: &mut Population,
        rng: &mut SimRng,
    ) -> StrategyResult<()>;
}

/// Generator that adds nothing; the engine default
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPopulation;

impl PopulationGenerator for EmptyPopulation {
    fn populate(
        &mut self,
        _config: &SimulationConfig,
        _population: &mut Population,
        _rng: &mut SimRng,
    ) -> StrategyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use sb988_core::{ClientType, ContractStatus, FreelancerType};

    #[test]
    fn test_insertion_order_is_iteration_order() {
        let mut population = Population::default();
        let names = ["c", "a", "b"];
        for name in names {
            population.insert_freelancer(Freelancer::new(
                name,
                FreelancerType::Consultant,
                dec!(40),
                Utc::now(),
            ));
        }

        let iterated: Vec<&str> = population
            .freelancers
            .values()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(iterated, names);
    }

    #[test]
    fn test_active_contracts() {
        let mut population = Population::default();
        let freelancer = Freelancer::new("f", FreelancerType::GigWorker, dec!(20), Utc::now());
        let client = Client::new("c", ClientType::Startup, Utc::now());

        for status in [
            ContractStatus::Active,
            ContractStatus::Draft,
            ContractStatus::Active,
        ] {
            population.insert_contract(Contract::new(
                freelancer.id(),
                client.id(),
                "work",
                status,
                Utc::now(),
            ));
        }

        assert_eq!(population.active_contracts(), 2);
        assert!(!population.is_empty());
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut population = Population::default();
        let client = Client::new("c", ClientType::Government, Utc::now());
        assert!(population.insert_client(client.clone()).is_none());
        assert_eq!(population.insert_client(client.clone()), Some(client));
    }
}
