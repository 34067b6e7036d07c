//! Regulatory scenarios
//!
//! A scenario is a time-windowed rule that mutates the population in place.
//! It is invoked on every step while active, so `apply` must tolerate
//! repetition: converge on a target state rather than accumulate.
//!
//! Contracts created by a scenario should take their id from
//! [`StepContext::next_id`] so seeded runs stay reproducible. A contract
//! that is completed or terminated when the phase starts must still be in
//! that status when it ends, whether changed through `transition_to` or by
//! replacing the whole entry; the engine fails the step otherwise. Removing
//! it is allowed.

use chrono::Duration;
use sb988_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::behavior::StepContext;
use crate::error::StrategyResult;
use crate::population::Population;

/// Pluggable policy rule evaluated once per step, in registration order
pub trait Scenario {
    /// Scenario name for logging and reports
    fn name(&self) -> &str;

    /// Whether the scenario's effects apply at `now`
    fn is_active(&self, now: Timestamp) -> bool;

    /// Mutate the population to reflect the rule
    fn apply(&mut self, population: &mut Population, ctx: &mut StepContext<'_>)
    -> StrategyResult<()>;

    /// Summary collected once at the end of a run
    fn results(&self) -> ScenarioReport;
}

/// Fixed-shape scenario outcome record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    /// Number of steps on which `apply` ran
    pub steps_applied: u64,
    pub first_applied: Option<Timestamp>,
    pub last_applied: Option<Timestamp>,
    /// Named numeric outcomes, ordered by name
    pub outcomes: BTreeMap<String, f64>,
}

impl ScenarioReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps_applied: 0,
            first_applied: None,
            last_applied: None,
            outcomes: BTreeMap::new(),
        }
    }

    /// Note one application at `now`
    pub fn record_application(&mut self, now: Timestamp) {
        self.steps_applied += 1;
        self.first_applied.get_or_insert(now);
        self.last_applied = Some(now);
    }

    /// Set a named outcome, replacing any previous value
    pub fn set_outcome(&mut self, key: impl Into<String>, value: f64) {
        self.outcomes.insert(key.into(), value);
    }

    /// Add to a named outcome, starting from zero
    pub fn add_outcome(&mut self, key: impl Into<String>, delta: f64) {
        *self.outcomes.entry(key.into()).or_insert(0.0) += delta;
    }
}

/// Half-open activation interval `[start, end)`; no end means open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationWindow {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl ActivationWindow {
    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Open-ended window starting once `grace_period_days` have passed
    /// after `enforcement_date`
    pub fn from_enforcement(enforcement_date: Timestamp, grace_period_days: u32) -> Self {
        Self {
            start: enforcement_date + Duration::days(i64::from(grace_period_days)),
            end: None,
        }
    }

    pub fn contains(&self, now: Timestamp) -> bool {
        now >= self.start && self.end.is_none_or(|end| now < end)
    }
}

/// Scenario built from an activation window and an apply function
///
/// The function returns how many entities it changed; the count is
/// accumulated under the `entities_affected` outcome.
pub struct WindowedScenario<F> {
    window: ActivationWindow,
    apply_fn: F,
    report: ScenarioReport,
}

impl<F> WindowedScenario<F>
where
    F: FnMut(&mut Population, &mut StepContext<'_>) -> StrategyResult<u64>,
{
    pub fn new(name: impl Into<String>, window: ActivationWindow, apply_fn: F) -> Self {
        let mut report = ScenarioReport::new(name);
        report.set_outcome("entities_affected", 0.0);

        Self {
            window,
            apply_fn,
            report,
        }
    }

    pub fn window(&self) -> ActivationWindow {
        self.window
    }
}

impl<F> Scenario for WindowedScenario<F>
where
    F: FnMut(&mut Population, &mut StepContext<'_>) -> StrategyResult<u64>,
{
    fn name(&self) -> &str {
        &self.report.name
    }

    fn is_active(&self, now: Timestamp) -> bool {
        self.window.contains(now)
    }

    fn apply(
        &mut self,
        population: &mut Population,
        ctx: &mut StepContext<'_>,
    ) -> StrategyResult<()> {
        let affected = (self.apply_fn)(population, ctx)?;
        self.report.record_application(ctx.now);
        self.report.add_outcome("entities_affected", affected as f64);
        Ok(())
    }

    fn results(&self) -> ScenarioReport {
        self.report.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::SimRng;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use sb988_core::{ComplianceStatus, Contract, ContractStatus};
    use uuid::Uuid;

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_window_is_half_open() {
        let window = ActivationWindow::new(ts(2024, 1, 1), Some(ts(2024, 2, 1)));

        assert!(!window.contains(ts(2023, 12, 31)));
        assert!(window.contains(ts(2024, 1, 1)));
        assert!(window.contains(ts(2024, 1, 31)));
        assert!(!window.contains(ts(2024, 2, 1)));
    }

    #[test]
    fn test_report_tracks_applications() {
        let mut report = ScenarioReport::new("audit");
        report.record_application(ts(2024, 1, 1));
        report.record_application(ts(2024, 1, 2));
        report.add_outcome("flagged", 2.0);
        report.add_outcome("flagged", 3.0);

        assert_eq!(report.steps_applied, 2);
        assert_eq!(report.first_applied, Some(ts(2024, 1, 1)));
        assert_eq!(report.last_applied, Some(ts(2024, 1, 2)));
        assert_eq!(report.outcomes["flagged"], 5.0);
    }

    #[test]
    fn test_windowed_scenario_is_idempotent_safe() {
        let mut population = Population::default();
        population.insert_contract(Contract::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "work",
            ContractStatus::Active,
            ts(2024, 1, 1),
        ));

        let mut scenario = WindowedScenario::new(
            "mark-compliant",
            ActivationWindow::new(ts(2024, 1, 1), None),
            |population: &mut Population, _ctx: &mut StepContext<'_>| -> StrategyResult<u64> {
                let mut changed = 0;
                for contract in population.contracts.values_mut() {
                    if contract.compliance_status != ComplianceStatus::Compliant {
                        contract.compliance_status = ComplianceStatus::Compliant;
                        changed += 1;
                    }
                }
                Ok(changed)
            },
        );

        let mut rng = SimRng::seed_from_u64(0);
        for day in 1..=3 {
            let mut ctx = StepContext {
                market: None,
                now: ts(2024, 1, day),
                step: u64::from(day - 1),
                rng: &mut rng,
            };
            assert!(scenario.is_active(ctx.now));
            scenario.apply(&mut population, &mut ctx).unwrap();
        }

        let report = scenario.results();
        assert_eq!(report.name, "mark-compliant");
        assert_eq!(report.steps_applied, 3);
        assert_eq!(report.outcomes["entities_affected"], 1.0);
    }
}
