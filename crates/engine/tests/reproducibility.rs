//! Seeded runs are reproducible byte for byte
//!
//! The strategies below draw every random decision from the engine's RNG
//! and create contracts with RNG-derived ids, so two runs with the same
//! seed must serialize to identical JSON.

use chrono::{Duration, TimeZone, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sb988_core::{
    Client, ComplianceStatus, Contract, ContractStatus, Freelancer, MarketConditions,
    SupervisionLevel,
};
use sb988_engine::{SimulationEngine, SyntheticPopulation};
use sb988_ports::{
    ClientBehavior, FreelancerBehavior, MarketDynamics, Population, SimulationConfig,
    StepContext, StrategyResult, WindowedScenario,
};

/// Freelancers nudge their rate up or down a little each step
struct RateDrift;

impl FreelancerBehavior for RateDrift {
    fn act(
        &mut self,
        freelancer: &mut Freelancer,
        _available_clients: &[&Client],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        let cents: i64 = ctx.rng.gen_range(-50..=50);
        let rate = freelancer.hourly_rate + Decimal::new(cents, 2);
        freelancer.hourly_rate = rate.max(dec!(15));
        if ctx.rng.gen_bool(0.05) {
            freelancer.sb988_aware = true;
        }
        Ok(())
    }
}

/// Clients become more aware of the regulation over time
struct AwarenessGrowth;

impl ClientBehavior for AwarenessGrowth {
    fn act(
        &mut self,
        client: &mut Client,
        _available_freelancers: &[&Freelancer],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        let delta: f64 = ctx.rng.gen_range(0.0..0.02);
        client.sb988_awareness = (client.sb988_awareness + delta).min(1.0);
        Ok(())
    }
}

/// Forms a few new contracts per step between random pairs
struct ContractFormation {
    per_step: usize,
}

impl MarketDynamics for ContractFormation {
    fn update(
        &mut self,
        population: &mut Population,
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<Option<MarketConditions>> {
        let freelancer_ids: Vec<_> = population.freelancers.keys().copied().collect();
        let client_ids: Vec<_> = population.clients.keys().copied().collect();
        let today = ctx.now.date_naive();

        for _ in 0..self.per_step {
            let (Some(&freelancer_id), Some(&client_id)) = (
                freelancer_ids.choose(ctx.rng),
                client_ids.choose(ctx.rng),
            ) else {
                break;
            };

            let days = ctx.rng.gen_range(3..30);
            let mut contract = Contract::new(
                freelancer_id,
                client_id,
                "Project",
                ContractStatus::Draft,
                ctx.now,
            )
            .with_id(ctx.next_id())
            .with_dates(today, today + Duration::days(days));
            contract.total_value = Decimal::new(ctx.rng.gen_range(50_000..500_000), 2);
            contract.exclusivity_clause = ctx.rng.gen_bool(0.2);
            contract.supervision_level = SupervisionLevel::ALL
                .choose(ctx.rng)
                .copied()
                .unwrap_or_default();
            contract.transition_to(ContractStatus::Negotiating)?;
            contract.transition_to(ContractStatus::Active)?;
            population.insert_contract(contract);
        }

        let demand = population.active_contracts() as f64 / (freelancer_ids.len().max(1)) as f64;
        Ok(Some(MarketConditions {
            market_demand: demand,
            regulatory_pressure: ctx.rng.r#gen(),
            economic_uncertainty: 0.5,
        }))
    }
}

fn config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
    );
    config.initial_freelancers = 80;
    config.initial_clients = 30;
    config.random_seed = Some(seed);
    config.sb988_enforcement_date = Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    config.compliance_grace_period_days = 14;
    config.convergence_threshold = 0.0;
    config
}

fn run(seed: u64) -> String {
    let config = config(seed);
    let window = config.enforcement_window().unwrap();

    let mut engine = SimulationEngine::new(config).unwrap();
    engine.set_population_generator(SyntheticPopulation::new());
    engine.set_freelancer_behavior(RateDrift);
    engine.set_client_behavior(AwarenessGrowth);
    engine.set_market_dynamics(ContractFormation { per_step: 3 });
    engine.add_scenario(WindowedScenario::new(
        "compliance review",
        window,
        |population: &mut Population, ctx: &mut StepContext<'_>| -> StrategyResult<u64> {
            let mut reviewed = 0;
            for contract in population.contracts.values_mut() {
                if contract.compliance_status != ComplianceStatus::PendingReview {
                    continue;
                }
                let score: f64 = ctx.rng.r#gen();
                contract.compliance_score = score;
                contract.compliance_status = if score > 0.4 && !contract.exclusivity_clause {
                    ComplianceStatus::Compliant
                } else {
                    ComplianceStatus::NonCompliant
                };
                reviewed += 1;
            }
            Ok(reviewed)
        },
    ));

    engine.run().unwrap().to_json().unwrap()
}

#[test]
fn test_same_seed_produces_identical_results() {
    let first = run(2024);
    let second = run(2024);

    assert_eq!(first.len(), second.len());
    assert!(first == second, "seeded runs diverged");
}

#[test]
fn test_different_seed_produces_different_results() {
    assert_ne!(run(1), run(2));
}

#[test]
fn test_seeded_run_exercises_every_phase() {
    let json: serde_json::Value = serde_json::from_str(&run(7)).unwrap();

    let summary = &json["execution_summary"];
    assert_eq!(summary["total_steps"], 91);
    assert_eq!(summary["final_population"]["freelancers"], 80);
    assert_eq!(summary["final_population"]["clients"], 30);
    assert_eq!(summary["final_population"]["contracts"], 91 * 3);

    // Review opens on Jan 29 and runs through Mar 31
    let review = &json["scenario_results"][0];
    assert_eq!(review["steps_applied"], 63);

    let evolution = json["market_evolution"].as_array().unwrap();
    let final_rate = evolution.last().unwrap()["compliance_rate"].as_f64().unwrap();
    assert!(final_rate > 0.0 && final_rate < 1.0, "rate {final_rate}");

    let completed = json["entities"]["contracts"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["status"] == "completed")
        .count();
    assert!(completed > 0);
}
