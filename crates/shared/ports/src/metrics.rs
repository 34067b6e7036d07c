use sb988_core::Timestamp;
use serde::Serialize;
use std::fmt::Debug;

use crate::error::StrategyResult;
use crate::population::PopulationView;

/// Port for per-step observation of the population
///
/// Collectors only ever see shared borrows, so observation cannot mutate
/// the entities it reads.
pub trait MetricsCollector {
    /// Accumulated result handed back at the end of a run
    type Summary: Clone + Debug + Serialize;

    /// Record whatever this collector tracks for the current step
    fn collect_step_metrics(
        &mut self,
        view: &PopulationView<'_>,
        now: Timestamp,
    ) -> StrategyResult<()>;

    /// Summary of everything collected so far
    fn summary(&self) -> Self::Summary;
}
