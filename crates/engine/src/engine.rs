//! Simulation engine - owns the population and drives the step loop
//!
//! Each step runs six phases in a fixed order:
//! 1. Market conditions (dynamics strategy, then a new snapshot)
//! 2. Agent behaviors (every freelancer, then every client)
//! 3. Contract lifecycle (active contracts past their end date complete)
//! 4. Regulatory scenarios (registration order, active ones only)
//! 5. Metrics collection (read-only)
//! 6. Advance the clock

use log::{debug, info, trace, warn};
use rand::SeedableRng;
use sb988_clock::StepClock;
use sb988_core::{
    Client, ClientId, Contract, ContractId, ContractStatus, EntityError, Freelancer,
    FreelancerId, MarketSnapshot, Timestamp, Transaction,
};
use sb988_ports::{
    ClientBehavior, Clients, Clock, Contracts, EmptyPopulation, FreelancerBehavior,
    Freelancers, MarketDynamics, MetricsCollector, NoOpBehavior, Population,
    PopulationGenerator, PopulationView, Scenario, SimRng, SimulationConfig, StepContext,
};

use crate::aggregates::{average_hourly_rate, compliance_rate, has_converged, transaction_volume_on};
use crate::error::{SimulationError, SimulationResult, StepPhase};
use crate::metrics::StepMetricsCollector;
use crate::results::{EntitySnapshot, ExecutionSummary, PopulationCounts, SimulationResults};

/// Time-stepped simulation of a freelancer/client market
pub struct SimulationEngine<M: MetricsCollector = StepMetricsCollector> {
    /// Run configuration, fixed for the run
    config: SimulationConfig,
    /// Simulated time
    clock: StepClock,
    /// Seeded once at construction, lent to every strategy
    rng: SimRng,
    /// Freelancer, client and contract mappings
    population: Population,
    /// Append-only transaction log
    transactions: Vec<Transaction>,
    /// Append-only market evolution
    market_snapshots: Vec<MarketSnapshot>,
    metrics: M,
    scenarios: Vec<Box<dyn Scenario>>,
    freelancer_behavior: Box<dyn FreelancerBehavior>,
    client_behavior: Box<dyn ClientBehavior>,
    market_dynamics: Box<dyn MarketDynamics>,
    population_generator: Box<dyn PopulationGenerator>,
    /// Steps executed since construction
    steps_executed: u64,
    /// Whether the population generator has run
    initialized: bool,
}

impl SimulationEngine<StepMetricsCollector> {
    /// Create an engine with the default metrics collector
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        Self::with_metrics(config, StepMetricsCollector::new())
    }
}

impl<M: MetricsCollector> SimulationEngine<M> {
    /// Create an engine with a custom metrics collector
    ///
    /// Validates the configuration and seeds the RNG. Without a configured
    /// seed the RNG is seeded from entropy and the run is not reproducible.
    pub fn with_metrics(config: SimulationConfig, metrics: M) -> SimulationResult<Self> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => {
                warn!("No random seed configured, run will not be reproducible");
                SimRng::from_entropy()
            }
        };

        Ok(Self {
            clock: StepClock::new(config.start_date, config.time_step),
            config,
            rng,
            population: Population::default(),
            transactions: Vec::new(),
            market_snapshots: Vec::new(),
            metrics,
            scenarios: Vec::new(),
            freelancer_behavior: Box::new(NoOpBehavior),
            client_behavior: Box::new(NoOpBehavior),
            market_dynamics: Box::new(NoOpBehavior),
            population_generator: Box::new(EmptyPopulation),
            steps_executed: 0,
            initialized: false,
        })
    }

    // ------------------------------------------------------------------
    // Injection
    // ------------------------------------------------------------------

    /// Register a scenario; scenarios run in registration order
    pub fn add_scenario(&mut self, scenario: impl Scenario + 'static) {
        debug!("Registered scenario '{}'", scenario.name());
        self.scenarios.push(Box::new(scenario));
    }

    pub fn set_freelancer_behavior(&mut self, behavior: impl FreelancerBehavior + 'static) {
        self.freelancer_behavior = Box::new(behavior);
    }

    pub fn set_client_behavior(&mut self, behavior: impl ClientBehavior + 'static) {
        self.client_behavior = Box::new(behavior);
    }

    pub fn set_market_dynamics(&mut self, dynamics: impl MarketDynamics + 'static) {
        self.market_dynamics = Box::new(dynamics);
    }

    pub fn set_population_generator(&mut self, generator: impl PopulationGenerator + 'static) {
        self.population_generator = Box::new(generator);
    }

    // ------------------------------------------------------------------
    // Data entry
    // ------------------------------------------------------------------

    /// Add a freelancer, rejecting invalid attributes and duplicate ids
    pub fn add_freelancer(&mut self, freelancer: Freelancer) -> SimulationResult<FreelancerId> {
        let id = freelancer.id();
        freelancer
            .validate()
            .map_err(SimulationError::invalid(id))
            .and_then(|()| self.ensure_unused(id))
            .inspect_err(|e| warn!("Rejected freelancer: {e}"))?;

        self.population.insert_freelancer(freelancer);
        Ok(id)
    }

    /// Add a client, rejecting invalid attributes and duplicate ids
    pub fn add_client(&mut self, client: Client) -> SimulationResult<ClientId> {
        let id = client.id();
        client
            .validate()
            .map_err(SimulationError::invalid(id))
            .and_then(|()| self.ensure_unused(id))
            .inspect_err(|e| warn!("Rejected client: {e}"))?;

        self.population.insert_client(client);
        Ok(id)
    }

    /// Add a contract between a known freelancer and a known client
    pub fn add_contract(&mut self, contract: Contract) -> SimulationResult<ContractId> {
        let id = contract.id();
        contract
            .validate()
            .map_err(SimulationError::invalid(id))
            .and_then(|()| self.ensure_unused(id))
            .and_then(|()| self.ensure_parties(&contract))
            .inspect_err(|e| warn!("Rejected contract: {e}"))?;

        self.population.insert_contract(contract);
        Ok(id)
    }

    /// Append a transaction whose contract, freelancer and client are known
    pub fn record_transaction(&mut self, transaction: Transaction) -> SimulationResult<()> {
        let result = if !self.population.contracts.contains_key(&transaction.contract_id) {
            Err(SimulationError::UnknownContract(transaction.contract_id))
        } else if !self.population.freelancers.contains_key(&transaction.freelancer_id) {
            Err(SimulationError::UnknownFreelancer(transaction.freelancer_id))
        } else if !self.population.clients.contains_key(&transaction.client_id) {
            Err(SimulationError::UnknownClient(transaction.client_id))
        } else {
            Ok(())
        };
        result.inspect_err(|e| warn!("Rejected transaction {}: {e}", transaction.id()))?;

        self.transactions.push(transaction);
        Ok(())
    }

    fn ensure_unused(&self, id: uuid::Uuid) -> SimulationResult<()> {
        let population = &self.population;
        if population.freelancers.contains_key(&id)
            || population.clients.contains_key(&id)
            || population.contracts.contains_key(&id)
        {
            return Err(SimulationError::DuplicateId(id));
        }
        Ok(())
    }

    fn ensure_parties(&self, contract: &Contract) -> SimulationResult<()> {
        if !self.population.freelancers.contains_key(&contract.freelancer_id) {
            return Err(SimulationError::UnknownFreelancer(contract.freelancer_id));
        }
        if !self.population.clients.contains_key(&contract.client_id) {
            return Err(SimulationError::UnknownClient(contract.client_id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Run the population generator once and validate what it produced
    ///
    /// Later calls are no-ops.
    pub fn initialize_population(&mut self) -> SimulationResult<()> {
        if self.initialized {
            return Ok(());
        }

        self.population_generator
            .populate(&self.config, &mut self.population, &mut self.rng)
            .map_err(SimulationError::strategy(StepPhase::Initialization))?;

        for freelancer in self.population.freelancers.values() {
            freelancer
                .validate()
                .map_err(SimulationError::invalid(freelancer.id()))?;
        }
        for client in self.population.clients.values() {
            client.validate().map_err(SimulationError::invalid(client.id()))?;
        }
        for contract in self.population.contracts.values() {
            contract
                .validate()
                .map_err(SimulationError::invalid(contract.id()))?;
            self.ensure_parties(contract)?;
        }

        self.initialized = true;
        info!(
            "Population initialized: {} freelancers, {} clients, {} contracts",
            self.population.freelancers.len(),
            self.population.clients.len(),
            self.population.contracts.len()
        );
        Ok(())
    }

    /// Execute one step: all six phases, then advance the clock
    ///
    /// A failing strategy aborts the step; phases that already ran are not
    /// rolled back.
    pub fn step(&mut self) -> SimulationResult<()> {
        let now = self.clock.now();
        let step = self.steps_executed;

        self.update_market_conditions(now, step)?;
        self.execute_agent_behaviors(now, step)?;
        self.process_contract_lifecycle()?;
        self.apply_scenarios(now, step)?;
        self.collect_metrics(now)?;

        self.clock.advance().ok_or(SimulationError::ClockOverflow {
            now,
            step_secs: self.config.time_step.num_seconds(),
        })?;
        self.steps_executed += 1;

        if let Some(snapshot) = self.market_snapshots.last() {
            debug!(
                "Step {} at {}: {} active contracts, compliance rate {:.4}",
                step,
                now.date_naive(),
                snapshot.active_contracts,
                snapshot.compliance_rate
            );
        }
        Ok(())
    }

    /// Initialize, then step until the end date, the iteration cap or
    /// convergence, whichever comes first
    pub fn run(mut self) -> SimulationResult<SimulationResults<M::Summary>> {
        info!(
            "Starting simulation: {} to {}, step {}s, max {} iterations",
            self.config.start_date,
            self.config.end_date,
            self.config.time_step.num_seconds(),
            self.config.max_iterations
        );

        self.initialize_population()?;

        let mut iteration = 0;
        while self.clock.now() <= self.config.end_date && iteration < self.config.max_iterations {
            self.step()?;
            iteration += 1;

            if self.is_converged() {
                info!("Converged after {} steps", self.steps_executed);
                break;
            }
        }

        if iteration == self.config.max_iterations && !self.is_converged() {
            info!("Iteration cap of {} reached", self.config.max_iterations);
        }

        let results = self.into_results();
        info!(
            "Simulation finished: {} steps, final compliance rate {:.4}",
            results.execution_summary.total_steps,
            results.final_snapshot().map_or(0.0, |s| s.compliance_rate)
        );
        Ok(results)
    }

    fn update_market_conditions(&mut self, now: Timestamp, step: u64) -> SimulationResult<()> {
        let terminal = self.terminal_contracts();
        let mut ctx = context(&self.market_snapshots, now, step, &mut self.rng);
        let conditions = self
            .market_dynamics
            .update(&mut self.population, &mut ctx)
            .map_err(SimulationError::strategy(StepPhase::MarketConditions))?
            .unwrap_or_default()
            .clamped();
        self.ensure_still_terminal(terminal)?;

        let snapshot = MarketSnapshot {
            timestamp: now,
            total_freelancers: self.population.freelancers.len(),
            total_clients: self.population.clients.len(),
            active_contracts: self.population.active_contracts(),
            total_transaction_volume: transaction_volume_on(&self.transactions, now.date_naive())
                .ok_or(SimulationError::Overflow("daily transaction volume"))?,
            average_hourly_rate: average_hourly_rate(&self.population.freelancers)
                .ok_or(SimulationError::Overflow("average hourly rate"))?,
            compliance_rate: compliance_rate(&self.population.contracts),
            conditions,
        };
        trace!("Appended market snapshot {:?}", snapshot);
        self.market_snapshots.push(snapshot);
        Ok(())
    }

    fn execute_agent_behaviors(&mut self, now: Timestamp, step: u64) -> SimulationResult<()> {
        let Population {
            freelancers,
            clients,
            ..
        } = &mut self.population;
        let phase = StepPhase::AgentBehaviors;

        {
            let available_clients: Vec<&Client> = clients.values().collect();
            let mut ctx = context(&self.market_snapshots, now, step, &mut self.rng);
            for freelancer in freelancers.values_mut() {
                self.freelancer_behavior
                    .act(freelancer, &available_clients, &mut ctx)
                    .map_err(SimulationError::strategy(phase))?;
            }
        }

        let available_freelancers: Vec<&Freelancer> = freelancers.values().collect();
        let mut ctx = context(&self.market_snapshots, now, step, &mut self.rng);
        for client in clients.values_mut() {
            self.client_behavior
                .act(client, &available_freelancers, &mut ctx)
                .map_err(SimulationError::strategy(phase))?;
        }

        Ok(())
    }

    fn process_contract_lifecycle(&mut self) -> SimulationResult<()> {
        let today = self.clock.today();
        let mut completed = 0;

        for contract in self.population.contracts.values_mut() {
            if contract.is_due_for_completion(today) {
                contract
                    .transition_to(ContractStatus::Completed)
                    .map_err(SimulationError::invalid(contract.id()))?;
                completed += 1;
            }
        }

        if completed > 0 {
            trace!("Completed {} contracts on {}", completed, today);
        }
        Ok(())
    }

    fn apply_scenarios(&mut self, now: Timestamp, step: u64) -> SimulationResult<()> {
        let terminal = self.terminal_contracts();

        for scenario in self.scenarios.iter_mut() {
            if !scenario.is_active(now) {
                continue;
            }

            trace!("Applying scenario '{}'", scenario.name());
            let mut ctx = context(&self.market_snapshots, now, step, &mut self.rng);
            scenario
                .apply(&mut self.population, &mut ctx)
                .map_err(SimulationError::strategy(StepPhase::RegulatoryScenarios))?;
        }

        self.ensure_still_terminal(terminal)
    }

    /// Completed and terminated contracts with their status
    ///
    /// Strategies that get the population mutably could overwrite one of
    /// these wholesale; pair with [`Self::ensure_still_terminal`].
    fn terminal_contracts(&self) -> Vec<(ContractId, ContractStatus)> {
        self.population
            .contracts
            .values()
            .filter(|c| c.status().is_terminal())
            .map(|c| (c.id(), c.status()))
            .collect()
    }

    /// Fail if a contract left a terminal status; removed contracts are fine
    fn ensure_still_terminal(
        &self,
        terminal: Vec<(ContractId, ContractStatus)>,
    ) -> SimulationResult<()> {
        for (id, from) in terminal {
            let Some(contract) = self.population.contracts.get(&id) else {
                continue;
            };
            if contract.status() != from {
                let source = EntityError::InvalidTransition {
                    from,
                    to: contract.status(),
                };
                warn!("Contract {id} left a terminal status: {source}");
                return Err(SimulationError::InvalidEntity { id, source });
            }
        }
        Ok(())
    }

    fn collect_metrics(&mut self, now: Timestamp) -> SimulationResult<()> {
        let view = PopulationView::new(&self.population, &self.transactions);
        self.metrics
            .collect_step_metrics(&view, now)
            .map_err(SimulationError::strategy(StepPhase::MetricsCollection))
    }

    fn into_results(self) -> SimulationResults<M::Summary> {
        let converged = self.is_converged();
        let execution_summary = ExecutionSummary {
            start_time: self.config.start_date,
            end_time: self.clock.now(),
            total_steps: self.steps_executed,
            converged,
            final_population: PopulationCounts::of(&self.population, &self.transactions),
        };

        SimulationResults {
            execution_summary,
            market_evolution: self.market_snapshots,
            metrics: self.metrics.summary(),
            scenario_results: self.scenarios.iter().map(|s| s.results()).collect(),
            entities: EntitySnapshot::from_population(self.population, self.transactions),
            config: self.config,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_time(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn market_snapshots(&self) -> &[MarketSnapshot] {
        &self.market_snapshots
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn freelancers(&self) -> &Freelancers {
        &self.population.freelancers
    }

    pub fn clients(&self) -> &Clients {
        &self.population.clients
    }

    pub fn contracts(&self) -> &Contracts {
        &self.population.contracts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn steps_executed(&self) -> u64 {
        self.steps_executed
    }

    /// Whether the compliance rate has been stable over the trailing window
    pub fn is_converged(&self) -> bool {
        has_converged(&self.market_snapshots, self.config.convergence_threshold)
    }
}

fn context<'a>(
    snapshots: &'a [MarketSnapshot],
    now: Timestamp,
    step: u64,
    rng: &'a mut SimRng,
) -> StepContext<'a> {
    StepContext {
        market: snapshots.last(),
        now,
        step,
        rng,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use sb988_core::{ClientType, FreelancerType};

    fn config() -> SimulationConfig {
        let mut config = SimulationConfig::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        );
        config.random_seed = Some(7);
        config
    }

    fn engine() -> SimulationEngine {
        SimulationEngine::new(config()).unwrap()
    }

    fn freelancer() -> Freelancer {
        Freelancer::new("Ana", FreelancerType::IndependentContractor, dec!(75), Utc::now())
    }

    fn client() -> Client {
        Client::new("Acme", ClientType::SmallBusiness, Utc::now())
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = config();
        config.max_iterations = 0;

        let result = SimulationEngine::new(config);
        assert!(matches!(result, Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_add_freelancer_rejects_duplicate_id() {
        let mut engine = engine();
        let freelancer = freelancer();

        engine.add_freelancer(freelancer.clone()).unwrap();
        let err = engine.add_freelancer(freelancer.clone()).unwrap_err();

        assert_eq!(err, SimulationError::DuplicateId(freelancer.id()));
        assert_eq!(engine.freelancers().len(), 1);
    }

    #[test]
    fn test_add_client_rejects_out_of_range_scalar() {
        let mut engine = engine();
        let mut client = client();
        client.risk_aversion = 1.5;

        let err = engine.add_client(client).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidEntity { .. }));
        assert!(engine.clients().is_empty());
    }

    #[test]
    fn test_add_contract_requires_known_parties() {
        let mut engine = engine();
        let freelancer_id = engine.add_freelancer(freelancer()).unwrap();
        let stranger = client();

        let contract = Contract::new(
            freelancer_id,
            stranger.id(),
            "Logo",
            ContractStatus::Draft,
            Utc::now(),
        );
        let err = engine.add_contract(contract).unwrap_err();
        assert_eq!(err, SimulationError::UnknownClient(stranger.id()));

        let client_id = engine.add_client(stranger).unwrap();
        let contract = Contract::new(
            freelancer_id,
            client_id,
            "Logo",
            ContractStatus::Draft,
            Utc::now(),
        );
        engine.add_contract(contract).unwrap();
        assert_eq!(engine.contracts().len(), 1);
    }

    #[test]
    fn test_record_transaction_requires_known_contract() {
        let mut engine = engine();
        let freelancer_id = engine.add_freelancer(freelancer()).unwrap();
        let client_id = engine.add_client(client()).unwrap();
        let contract = Contract::new(
            freelancer_id,
            client_id,
            "Copy",
            ContractStatus::Active,
            Utc::now(),
        );

        let orphan = Transaction::for_contract(&contract, dec!(100), Utc::now());
        let err = engine.record_transaction(orphan).unwrap_err();
        assert_eq!(err, SimulationError::UnknownContract(contract.id()));

        let tx = Transaction::for_contract(&contract, dec!(100), Utc::now());
        engine.add_contract(contract).unwrap();
        engine.record_transaction(tx).unwrap();
        assert_eq!(engine.transactions().len(), 1);
    }

    #[test]
    fn test_initialize_population_runs_generator_once() {
        struct Counting(usize);
        impl PopulationGenerator for Counting {
            fn populate(
                &mut self,
                _config: &SimulationConfig,
                population: &mut Population,
                _rng: &mut SimRng,
            ) -> sb988_ports::StrategyResult<()> {
                self.0 += 1;
                population.insert_freelancer(Freelancer::new(
                    format!("gen-{}", self.0),
                    FreelancerType::GigWorker,
                    dec!(20),
                    Utc::now(),
                ));
                Ok(())
            }
        }

        let mut engine = engine();
        engine.set_population_generator(Counting(0));
        engine.initialize_population().unwrap();
        engine.initialize_population().unwrap();

        assert_eq!(engine.freelancers().len(), 1);
    }

    #[test]
    fn test_step_advances_clock_by_time_step() {
        let mut engine = engine();
        let start = engine.current_time();

        engine.step().unwrap();
        engine.step().unwrap();

        assert_eq!(engine.current_time(), start + chrono::Duration::days(2));
        assert_eq!(engine.steps_executed(), 2);
        assert_eq!(engine.market_snapshots().len(), 2);
        assert_eq!(engine.market_snapshots()[1].timestamp, start + chrono::Duration::days(1));
    }

    #[test]
    fn test_step_past_representable_time_fails() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut config = SimulationConfig::new(start, start);
        config.time_step = chrono::Duration::days(73_000_000);
        let mut engine = SimulationEngine::new(config).unwrap();

        engine.step().unwrap();
        let reached = engine.current_time();
        let err = engine.step().unwrap_err();

        assert_eq!(
            err,
            SimulationError::ClockOverflow {
                now: reached,
                step_secs: chrono::Duration::days(73_000_000).num_seconds(),
            }
        );
        assert_eq!(engine.current_time(), reached);
        assert_eq!(engine.steps_executed(), 1);
    }

    #[test]
    fn test_unrepresentable_average_rate_fails_step() {
        let mut engine = engine();
        for name in ["Ana", "Bo"] {
            let rich = Freelancer::new(
                name,
                FreelancerType::Consultant,
                rust_decimal::Decimal::MAX,
                Utc::now(),
            );
            engine.add_freelancer(rich).unwrap();
        }

        let err = engine.step().unwrap_err();
        assert_eq!(err, SimulationError::Overflow("average hourly rate"));
        assert!(engine.market_snapshots().is_empty());
    }

    #[test]
    fn test_run_with_huge_base_rate_fails_at_initialization() {
        let mut config = config();
        config.initial_freelancers = 3;
        config.base_hourly_rate =
            rust_decimal::Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.set_population_generator(crate::population::SyntheticPopulation::new());

        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Strategy {
                phase: StepPhase::Initialization,
                ..
            }
        ));
    }
}
