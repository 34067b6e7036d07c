use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientId, Contract, ContractId, FreelancerId};
use crate::values::{Money, Timestamp, checked_sum};

/// Unique identifier for a transaction
pub type TransactionId = Uuid;

closed_enum! {
    /// Settlement status of a payment
    pub enum TransactionStatus: "transaction status" {
        Pending = "pending",
        Completed = "completed",
        Failed = "failed",
        Disputed = "disputed",
    }
}

/// A payment between a client and a freelancer under a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    pub contract_id: ContractId,
    pub freelancer_id: FreelancerId,
    pub client_id: ClientId,
    pub amount: Money,
    pub transaction_date: Timestamp,
    pub payment_method: String,
    pub status: TransactionStatus,

    // Costs attributable to SB 988
    pub compliance_costs: Money,
    pub administrative_overhead: Money,
    pub dispute_costs: Money,

    pub description: Option<String>,
    pub reference_number: Option<String>,
}

impl Transaction {
    /// Create a pending transaction with a fresh random id
    pub fn new(
        contract_id: ContractId,
        freelancer_id: FreelancerId,
        client_id: ClientId,
        amount: Money,
        transaction_date: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_id,
            freelancer_id,
            client_id,
            amount,
            transaction_date,
            payment_method: "bank_transfer".to_string(),
            status: TransactionStatus::Pending,
            compliance_costs: Decimal::ZERO,
            administrative_overhead: Decimal::ZERO,
            dispute_costs: Decimal::ZERO,
            description: None,
            reference_number: None,
        }
    }

    /// Create a pending payment against an existing contract
    pub fn for_contract(contract: &Contract, amount: Money, transaction_date: Timestamp) -> Self {
        Self::new(
            contract.id(),
            contract.freelancer_id,
            contract.client_id,
            amount,
            transaction_date,
        )
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Total cost attributable to the regulation; `None` on overflow
    pub fn total_regulatory_cost(&self) -> Option<Money> {
        checked_sum([
            self.compliance_costs,
            self.administrative_overhead,
            self.dispute_costs,
        ])
    }
}
