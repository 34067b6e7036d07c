//! Pure aggregate helpers over the current state
//!
//! Used to build market snapshots and to test convergence. None of these
//! touch the engine; they are functions of the collections passed in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sb988_core::{MarketSnapshot, Money, Transaction, checked_sum};
use sb988_ports::{Contracts, Freelancers};

/// Number of trailing snapshots the convergence check looks at
pub const CONVERGENCE_WINDOW: usize = 10;

/// Arithmetic mean of every freelancer's hourly rate; zero when there are
/// none, `None` when the rates do not sum to a representable amount
pub fn average_hourly_rate(freelancers: &Freelancers) -> Option<Money> {
    if freelancers.is_empty() {
        return Some(Decimal::ZERO);
    }

    checked_sum(freelancers.values().map(|f| f.hourly_rate))?
        .checked_div(Decimal::from(freelancers.len()))
}

/// Compliant contracts over all contracts; zero when there are none
pub fn compliance_rate(contracts: &Contracts) -> f64 {
    if contracts.is_empty() {
        return 0.0;
    }

    let compliant = contracts.values().filter(|c| c.is_compliant()).count();
    compliant as f64 / contracts.len() as f64
}

/// Total amount of transactions dated on `date`; `None` on overflow
pub fn transaction_volume_on(transactions: &[Transaction], date: NaiveDate) -> Option<Money> {
    checked_sum(
        transactions
            .iter()
            .filter(|t| t.transaction_date.date_naive() == date)
            .map(|t| t.amount),
    )
}

/// Population variance (divides by n); zero for an empty slice
///
/// Computed on values shifted by the first element, so a constant series
/// yields exactly zero.
pub fn population_variance(values: &[f64]) -> f64 {
    let Some(&shift) = values.first() else {
        return 0.0;
    };

    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0, 0.0), |(sum, sum_sq), v| {
        let d = v - shift;
        (sum + d, sum_sq + d * d)
    });
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Stability heuristic: the compliance rate over the last
/// [`CONVERGENCE_WINDOW`] snapshots has variance strictly below
/// `threshold`
///
/// A flat series converges even if it is flat only because nothing is
/// happening yet.
pub fn has_converged(snapshots: &[MarketSnapshot], threshold: f64) -> bool {
    if snapshots.len() < CONVERGENCE_WINDOW {
        return false;
    }

    let recent: Vec<f64> = snapshots[snapshots.len() - CONVERGENCE_WINDOW..]
        .iter()
        .map(|s| s.compliance_rate)
        .collect();

    population_variance(&recent) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use sb988_core::{
        ComplianceStatus, Contract, ContractStatus, Freelancer, FreelancerType, MarketConditions,
    };
    use uuid::Uuid;

    fn snapshot(compliance_rate: f64) -> MarketSnapshot {
        MarketSnapshot {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            total_freelancers: 0,
            total_clients: 0,
            active_contracts: 0,
            total_transaction_volume: Decimal::ZERO,
            average_hourly_rate: Decimal::ZERO,
            compliance_rate,
            conditions: MarketConditions::default(),
        }
    }

    #[test]
    fn test_average_hourly_rate() {
        let mut freelancers = Freelancers::new();
        assert_eq!(average_hourly_rate(&freelancers), Some(Decimal::ZERO));

        for rate in [dec!(40.00), dec!(55.50), dec!(70.25)] {
            let f = Freelancer::new("f", FreelancerType::Consultant, rate, Utc::now());
            freelancers.insert(f.id(), f);
        }
        assert_eq!(average_hourly_rate(&freelancers), Some(dec!(55.25)));
    }

    #[test]
    fn test_sums_past_decimal_range_are_reported() {
        let mut freelancers = Freelancers::new();
        for _ in 0..2 {
            let f = Freelancer::new("f", FreelancerType::Consultant, Decimal::MAX, Utc::now());
            freelancers.insert(f.id(), f);
        }
        assert_eq!(average_hourly_rate(&freelancers), None);

        let when = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let contract =
            Contract::new(Uuid::new_v4(), Uuid::new_v4(), "w", ContractStatus::Active, when);
        let transactions = vec![
            Transaction::for_contract(&contract, Decimal::MAX, when),
            Transaction::for_contract(&contract, Decimal::MAX, when),
        ];
        assert_eq!(transaction_volume_on(&transactions, when.date_naive()), None);
        assert_eq!(
            transaction_volume_on(&transactions, when.date_naive().succ_opt().unwrap()),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_compliance_rate() {
        let mut contracts = Contracts::new();
        assert_eq!(compliance_rate(&contracts), 0.0);

        for status in [
            ComplianceStatus::Compliant,
            ComplianceStatus::NonCompliant,
            ComplianceStatus::PendingReview,
            ComplianceStatus::Compliant,
        ] {
            let mut c = Contract::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "w",
                ContractStatus::Active,
                Utc::now(),
            );
            c.compliance_status = status;
            contracts.insert(c.id(), c);
        }
        assert_relative_eq!(compliance_rate(&contracts), 0.5);
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[0.3; 10]), 0.0);
        assert_relative_eq!(population_variance(&[1.0, 2.0, 3.0, 4.0]), 1.25);
    }

    #[test]
    fn test_needs_full_window() {
        let snapshots: Vec<_> = (0..9).map(|_| snapshot(0.4)).collect();
        assert!(!has_converged(&snapshots, 1.0));
    }

    #[test]
    fn test_flat_series_converges_for_any_positive_threshold() {
        let snapshots: Vec<_> = (0..10).map(|_| snapshot(0.42)).collect();
        assert!(has_converged(&snapshots, f64::MIN_POSITIVE));
        assert!(!has_converged(&snapshots, 0.0));
    }

    #[test]
    fn test_alternating_series_has_variance_quarter() {
        let snapshots: Vec<_> = (0..10)
            .map(|i| snapshot(if i % 2 == 0 { 0.0 } else { 1.0 }))
            .collect();

        assert!(!has_converged(&snapshots, 0.25));
        assert!(!has_converged(&snapshots, 0.2499));
        assert!(has_converged(&snapshots, 0.2501));
    }

    #[test]
    fn test_only_trailing_window_counts() {
        let mut snapshots: Vec<_> = (0..5).map(|i| snapshot(i as f64)).collect();
        snapshots.extend((0..10).map(|_| snapshot(0.7)));
        assert!(has_converged(&snapshots, 0.001));
    }
}
