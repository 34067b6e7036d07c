//! Behavioral model slots
//!
//! One trait per strategy role. The engine holds one instance of each and
//! defaults to [`NoOpBehavior`], so the step loop never branches on a
//! missing model. Closures with the matching signature implement the
//! traits directly.

use rand::rngs::StdRng;
use sb988_core::{Client, Freelancer, MarketConditions, MarketSnapshot, Timestamp, generate_id};
use uuid::Uuid;

use crate::error::StrategyResult;
use crate::population::Population;

/// RNG owned by the engine and lent to strategies
pub type SimRng = StdRng;

/// Per-call view of the running step
pub struct StepContext<'a> {
    /// Most recent market snapshot, if one exists yet
    pub market: Option<&'a MarketSnapshot>,
    /// Current simulated time
    pub now: Timestamp,
    /// Zero-based index of the step being executed
    pub step: u64,
    /// The engine's seeded RNG
    pub rng: &'a mut SimRng,
}

impl StepContext<'_> {
    /// Draw an entity id from the engine's RNG
    ///
    /// Entities created during a step should take their id from here via
    /// `with_id`; the ids `new` assigns come from the OS and differ between
    /// runs with the same seed.
    pub fn next_id(&mut self) -> Uuid {
        generate_id(&mut *self.rng)
    }
}

/// Decides what one freelancer does in a step
pub trait FreelancerBehavior {
    fn act(
        &mut self,
        freelancer: &mut Freelancer,
        available_clients: &[&Client],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()>;
}

/// Decides what one client does in a step
pub trait ClientBehavior {
    fn act(
        &mut self,
        client: &mut Client,
        available_freelancers: &[&Freelancer],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()>;
}

/// Moves market-wide conditions once per step
///
/// Returned conditions, if any, are recorded on this step's snapshot; the
/// rest of the step does not depend on them. New entities should use
/// [`StepContext::next_id`]. Completed and terminated contracts must keep
/// their status or the step fails.
pub trait MarketDynamics {
    fn update(
        &mut self,
        population: &mut Population,
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<Option<MarketConditions>>;
}

/// Strategy that does nothing; the default for every slot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBehavior;

impl FreelancerBehavior for NoOpBehavior {
    fn act(
        &mut self,
        _freelancer: &mut Freelancer,
        _available_clients: &[&Client],
        _ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        Ok(())
    }
}

impl ClientBehavior for NoOpBehavior {
    fn act(
        &mut self,
        _client: &mut Client,
        _available_freelancers: &[&Freelancer],
        _ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        Ok(())
    }
}

impl MarketDynamics for NoOpBehavior {
    fn update(
        &mut self,
        _population: &mut Population,
        _ctx: &mut StepContext<'_>,
    ) -> StrategyResult<Option<MarketConditions>> {
        Ok(None)
    }
}

impl<F> FreelancerBehavior for F
where
    F: FnMut(&mut Freelancer, &[&Client], &mut StepContext<'_>) -> StrategyResult<()>,
{
    fn act(
        &mut self,
        freelancer: &mut Freelancer,
        available_clients: &[&Client],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        self(freelancer, available_clients, ctx)
    }
}

impl<F> ClientBehavior for F
where
    F: FnMut(&mut Client, &[&Freelancer], &mut StepContext<'_>) -> StrategyResult<()>,
{
    fn act(
        &mut self,
        client: &mut Client,
        available_freelancers: &[&Freelancer],
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        self(client, available_freelancers, ctx)
    }
}

impl<F> MarketDynamics for F
where
    F: FnMut(&mut Population, &mut StepContext<'_>) -> StrategyResult<Option<MarketConditions>>,
{
    fn update(
        &mut self,
        population: &mut Population,
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<Option<MarketConditions>> {
        self(population, ctx)
    }
}
