//! Default metrics collector
//!
//! Records one [`StepMetrics`] row per step and rolls them up into a
//! [`MetricsSummary`] at the end of a run.

use sb988_core::{ComplianceStatus, ContractStatus, Money, Timestamp, checked_sum};
use sb988_ports::{MetricsCollector, PopulationView, StrategyError, StrategyResult};
use serde::{Deserialize, Serialize};

use crate::aggregates::{compliance_rate, transaction_volume_on};

const COMPONENT: &str = "step metrics";

fn overflow(what: &str) -> StrategyError {
    StrategyError::failed(COMPONENT, format!("{what} overflowed"))
}

/// Contract counts per lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStatusCounts {
    pub draft: usize,
    pub negotiating: usize,
    pub active: usize,
    pub completed: usize,
    pub terminated: usize,
    pub disputed: usize,
}

impl ContractStatusCounts {
    fn record(&mut self, status: ContractStatus) {
        match status {
            ContractStatus::Draft => self.draft += 1,
            ContractStatus::Negotiating => self.negotiating += 1,
            ContractStatus::Active => self.active += 1,
            ContractStatus::Completed => self.completed += 1,
            ContractStatus::Terminated => self.terminated += 1,
            ContractStatus::Disputed => self.disputed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.draft
            + self.negotiating
            + self.active
            + self.completed
            + self.terminated
            + self.disputed
    }
}

/// Contract counts per compliance determination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCounts {
    pub compliant: usize,
    pub non_compliant: usize,
    pub pending_review: usize,
    pub disputed: usize,
}

impl ComplianceCounts {
    fn record(&mut self, status: ComplianceStatus) {
        match status {
            ComplianceStatus::Compliant => self.compliant += 1,
            ComplianceStatus::NonCompliant => self.non_compliant += 1,
            ComplianceStatus::PendingReview => self.pending_review += 1,
            ComplianceStatus::Disputed => self.disputed += 1,
        }
    }
}

/// Observations for a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    pub timestamp: Timestamp,
    pub freelancers: usize,
    pub clients: usize,
    pub contracts: ContractStatusCounts,
    pub compliance: ComplianceCounts,
    pub compliance_rate: f64,
    /// Mean compliance score over all contracts (0 when none)
    pub mean_compliance_score: f64,
    /// Mean administrative burden (hours) over all contracts
    pub mean_administrative_burden: f64,
    pub sb988_aware_freelancers: usize,
    /// Volume of transactions dated on this step's day
    pub transaction_volume: Money,
    /// Regulatory costs of transactions dated on this step's day
    pub regulatory_costs: Money,
}

/// Rollup returned at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub steps: usize,
    pub mean_compliance_rate: f64,
    pub final_compliance_rate: f64,
    pub peak_active_contracts: usize,
    /// Every transaction observed over the run, each counted once
    pub total_transaction_volume: Money,
    pub total_regulatory_costs: Money,
    pub history: Vec<StepMetrics>,
}

/// Collector that keeps a full per-step history
#[derive(Debug, Clone, Default)]
pub struct StepMetricsCollector {
    history: Vec<StepMetrics>,
    /// Length of the transaction log already folded into the totals
    transactions_seen: usize,
    total_volume: Money,
    total_regulatory_costs: Money,
}

impl StepMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[StepMetrics] {
        &self.history
    }

    /// Most recent row, if any step has been observed
    pub fn latest(&self) -> Option<&StepMetrics> {
        self.history.last()
    }
}

impl MetricsCollector for StepMetricsCollector {
    type Summary = MetricsSummary;

    fn collect_step_metrics(
        &mut self,
        view: &PopulationView<'_>,
        now: Timestamp,
    ) -> StrategyResult<()> {
        let mut contracts = ContractStatusCounts::default();
        let mut compliance = ComplianceCounts::default();
        let mut score_sum = 0.0;
        let mut burden_sum = 0.0;

        for contract in view.contracts.values() {
            contracts.record(contract.status());
            compliance.record(contract.compliance_status);
            score_sum += contract.compliance_score;
            burden_sum += contract.administrative_burden_score;
        }

        let n_contracts = view.contracts.len();
        let (mean_compliance_score, mean_administrative_burden) = if n_contracts == 0 {
            (0.0, 0.0)
        } else {
            (
                score_sum / n_contracts as f64,
                burden_sum / n_contracts as f64,
            )
        };

        let today = now.date_naive();
        let regulatory_costs = view
            .transactions
            .iter()
            .filter(|t| t.transaction_date.date_naive() == today)
            .map(|t| t.total_regulatory_cost())
            .try_fold(Money::ZERO, |total, cost| total.checked_add(cost?))
            .ok_or_else(|| overflow("daily regulatory cost"))?;
        let transaction_volume = transaction_volume_on(view.transactions, today)
            .ok_or_else(|| overflow("daily transaction volume"))?;

        // The log is append-only, so anything past the mark is new
        let new = view.transactions.get(self.transactions_seen..).unwrap_or_default();
        let total_volume = checked_sum(
            std::iter::once(self.total_volume).chain(new.iter().map(|tx| tx.amount)),
        )
        .ok_or_else(|| overflow("total transaction volume"))?;
        let mut total_regulatory_costs = self.total_regulatory_costs;
        for tx in new {
            total_regulatory_costs = tx
                .total_regulatory_cost()
                .and_then(|cost| total_regulatory_costs.checked_add(cost))
                .ok_or_else(|| overflow("total regulatory cost"))?;
        }
        self.total_volume = total_volume;
        self.total_regulatory_costs = total_regulatory_costs;
        self.transactions_seen = view.transactions.len();

        self.history.push(StepMetrics {
            timestamp: now,
            freelancers: view.freelancers.len(),
            clients: view.clients.len(),
            contracts,
            compliance,
            compliance_rate: compliance_rate(view.contracts),
            mean_compliance_score,
            mean_administrative_burden,
            sb988_aware_freelancers: view.freelancers.values().filter(|f| f.sb988_aware).count(),
            transaction_volume,
            regulatory_costs,
        });

        Ok(())
    }

    fn summary(&self) -> MetricsSummary {
        let steps = self.history.len();
        let mean_compliance_rate = if steps == 0 {
            0.0
        } else {
            self.history.iter().map(|m| m.compliance_rate).sum::<f64>() / steps as f64
        };

        MetricsSummary {
            steps,
            mean_compliance_rate,
            final_compliance_rate: self.latest().map_or(0.0, |m| m.compliance_rate),
            peak_active_contracts: self
                .history
                .iter()
                .map(|m| m.contracts.active)
                .max()
                .unwrap_or(0),
            total_transaction_volume: self.total_volume,
            total_regulatory_costs: self.total_regulatory_costs,
            history: self.history.clone(),
        }
    }
}
