//! Synthetic population generator
//!
//! Fills the population with randomly attributed freelancers and clients
//! drawn from the engine's seeded RNG, so a fixed seed always produces the
//! same population, ids included.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, LogNormal};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sb988_core::{
    Client, ClientType, CompliancePreference, CompliancePriority, Freelancer, FreelancerType,
    Money, generate_id,
};
use sb988_ports::{
    Population, PopulationGenerator, SimRng, SimulationConfig, StrategyError, StrategyResult,
};

const COMPONENT: &str = "synthetic population";

const SKILLS: &[&str] = &[
    "software_development",
    "graphic_design",
    "copywriting",
    "translation",
    "video_production",
    "data_analysis",
    "marketing",
    "bookkeeping",
    "photography",
    "consulting",
];

const LOCATIONS: &[&str] = &[
    "Los Angeles",
    "San Francisco",
    "San Diego",
    "Sacramento",
    "San Jose",
    "Fresno",
    "Oakland",
];

const INDUSTRIES: &[&str] = &[
    "technology",
    "media",
    "healthcare",
    "retail",
    "finance",
    "entertainment",
    "public_sector",
];

const SIZES: &[&str] = &["small", "medium", "large"];

/// Median annual revenue for generated clients, in whole currency units
const MEDIAN_CLIENT_REVENUE: f64 = 2_000_000.0;

/// Generator producing `initial_freelancers` freelancers and
/// `initial_clients` clients
#[derive(Debug, Clone, Copy)]
pub struct SyntheticPopulation {
    /// Log-space standard deviation of hourly rates around the base rate
    rate_dispersion: f64,
    /// Log-space standard deviation of client revenue
    revenue_dispersion: f64,
}

impl Default for SyntheticPopulation {
    fn default() -> Self {
        Self {
            rate_dispersion: 0.35,
            revenue_dispersion: 1.0,
        }
    }
}

impl SyntheticPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate_dispersion(mut self, sigma: f64) -> Self {
        self.rate_dispersion = sigma;
        self
    }

    pub fn with_revenue_dispersion(mut self, sigma: f64) -> Self {
        self.revenue_dispersion = sigma;
        self
    }

    fn freelancer(
        &self,
        index: usize,
        config: &SimulationConfig,
        base_rate: f64,
        rates: &LogNormal<f64>,
        rng: &mut SimRng,
    ) -> StrategyResult<Freelancer> {
        let hourly_rate = to_money(base_rate * rates.sample(rng), 2)?;
        let billable_hours: u32 = rng.gen_range(500..2000);

        let mut freelancer = Freelancer::new(
            format!("Freelancer {index}"),
            pick(rng, FreelancerType::ALL),
            hourly_rate,
            config.start_date,
        )
        .with_id(generate_id(rng));

        let skill_count = rng.gen_range(1..=4);
        freelancer.skills = SKILLS
            .choose_multiple(rng, skill_count)
            .map(|s| s.to_string())
            .collect();
        freelancer.experience_years = (rng.gen_range(0.0..30.0_f64) * 10.0).round() / 10.0;
        freelancer.location = pick(rng, LOCATIONS).to_string();
        freelancer.sb988_aware = rng.gen_bool(config.regulatory_enforcement_level);
        freelancer.compliance_preference = pick(rng, CompliancePreference::ALL);
        freelancer.administrative_capacity = rng.r#gen();
        freelancer.annual_income = Some(
            hourly_rate
                .checked_mul(Decimal::from(billable_hours))
                .ok_or_else(|| overflow("annual income", hourly_rate))?,
        );
        freelancer.primary_client_dependency = rng.r#gen();
        freelancer.risk_tolerance = rng.r#gen();
        freelancer.negotiation_skill = rng.r#gen();
        freelancer.market_knowledge = rng.r#gen();

        Ok(freelancer)
    }

    fn client(
        &self,
        index: usize,
        config: &SimulationConfig,
        revenues: &LogNormal<f64>,
        rng: &mut SimRng,
    ) -> StrategyResult<Client> {
        let revenue = to_money(MEDIAN_CLIENT_REVENUE * revenues.sample(rng), 0)?;
        let spend_share = to_money(rng.gen_range(0.01..0.15), 4)?;

        let mut client = Client::new(
            format!("Client {index}"),
            pick(rng, ClientType::ALL),
            config.start_date,
        )
        .with_id(generate_id(rng));

        client.industry = pick(rng, INDUSTRIES).to_string();
        client.size = pick(rng, SIZES).to_string();
        client.location = pick(rng, LOCATIONS).to_string();
        client.annual_revenue = Some(revenue);
        client.freelancer_spend_budget = Some(
            revenue
                .checked_mul(spend_share)
                .ok_or_else(|| overflow("spend budget", revenue))?
                .round_dp(2),
        );
        client.sb988_awareness = rng.r#gen();
        client.compliance_priority = pick(rng, CompliancePriority::ALL);
        client.legal_resources = rng.r#gen();
        client.risk_aversion = rng.r#gen();
        client.negotiation_power = rng.r#gen();
        client.market_influence = rng.r#gen();

        Ok(client)
    }
}

impl PopulationGenerator for SyntheticPopulation {
    fn populate(
        &mut self,
        config: &SimulationConfig,
        population: &mut Population,
        rng: &mut SimRng,
    ) -> StrategyResult<()> {
        let rates = log_normal(self.rate_dispersion)?;
        let revenues = log_normal(self.revenue_dispersion)?;
        let base_rate = config.base_hourly_rate.to_f64().ok_or_else(|| {
            StrategyError::failed(COMPONENT, "base hourly rate is not representable")
        })?;

        for index in 0..config.initial_freelancers {
            let freelancer = self.freelancer(index, config, base_rate, &rates, rng)?;
            population.insert_freelancer(freelancer);
        }

        for index in 0..config.initial_clients {
            let client = self.client(index, config, &revenues, rng)?;
            population.insert_client(client);
        }

        info!(
            "Generated synthetic population: {} freelancers, {} clients",
            config.initial_freelancers, config.initial_clients
        );

        Ok(())
    }
}

fn log_normal(sigma: f64) -> StrategyResult<LogNormal<f64>> {
    LogNormal::new(0.0, sigma)
        .map_err(|e| StrategyError::failed(COMPONENT, format!("invalid dispersion {sigma}: {e}")))
}

fn pick<T: Copy>(rng: &mut SimRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn overflow(field: &str, from: Money) -> StrategyError {
    StrategyError::failed(COMPONENT, format!("{field} derived from {from} overflows"))
}

fn to_money(value: f64, dp: u32) -> StrategyResult<Money> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| StrategyError::failed(COMPONENT, format!("{value} is not a finite amount")))
}
