use serde::{Deserialize, Serialize};

use crate::values::{Money, Timestamp};

/// Derived market indicators, each on a 0-1 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub market_demand: f64,
    pub regulatory_pressure: f64,
    pub economic_uncertainty: f64,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self {
            market_demand: 0.5,
            regulatory_pressure: 0.5,
            economic_uncertainty: 0.5,
        }
    }
}

impl MarketConditions {
    /// Clamp every indicator into [0, 1]; NaN falls back to the neutral 0.5
    pub fn clamped(self) -> Self {
        fn unit(v: f64) -> f64 {
            if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
        }

        Self {
            market_demand: unit(self.market_demand),
            regulatory_pressure: unit(self.regulatory_pressure),
            economic_uncertainty: unit(self.economic_uncertainty),
        }
    }
}

/// Point-in-time rollup of the market, appended once per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: Timestamp,
    pub total_freelancers: usize,
    pub total_clients: usize,
    pub active_contracts: usize,
    /// Volume of transactions dated on the snapshot's calendar day
    pub total_transaction_volume: Money,
    pub average_hourly_rate: Money,
    /// Compliant contracts over all contracts
    pub compliance_rate: f64,
    #[serde(flatten)]
    pub conditions: MarketConditions,
}
