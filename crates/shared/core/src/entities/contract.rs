use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientId, ComplianceStatus, ContractStatus, FreelancerId, SupervisionLevel};
use crate::error::{EntityError, EntityResult};
use crate::values::{
    Money, Timestamp, check_non_negative, check_non_negative_money, check_unit_interval,
    checked_sum,
};

/// Unique identifier for a contract
pub type ContractId = Uuid;

/// A payable checkpoint inside a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub completed: bool,
}

impl Milestone {
    pub fn new(name: impl Into<String>, amount: Money, due_date: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            due_date,
            amount,
            completed: false,
        }
    }
}

/// Agreement between one freelancer and one client
///
/// The referenced freelancer and client ids are not checked here; the
/// engine validates them when a contract is registered through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    id: ContractId,
    pub freelancer_id: FreelancerId,
    pub client_id: ClientId,
    pub title: String,
    pub description: String,
    status: ContractStatus,
    pub created_at: Timestamp,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    // Financial terms
    pub total_value: Money,
    pub payment_terms: String,
    pub currency: String,

    // Work characteristics
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub deliverables: Vec<String>,
    pub milestones: Vec<Milestone>,

    // Compliance
    pub compliance_status: ComplianceStatus,
    /// Strength of the compliance determination (0-1)
    pub compliance_score: f64,
    pub compliance_requirements: Vec<String>,
    /// Hours of administrative work the terms impose
    pub administrative_burden_score: f64,

    // Terms that feed the compliance determination
    pub exclusivity_clause: bool,
    pub location_requirements: Option<String>,
    pub equipment_provided: bool,
    pub supervision_level: SupervisionLevel,
}

impl Contract {
    /// Create a contract with a fresh random id and default terms
    pub fn new(
        freelancer_id: FreelancerId,
        client_id: ClientId,
        title: impl Into<String>,
        status: ContractStatus,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            freelancer_id,
            client_id,
            title: title.into(),
            description: String::new(),
            status,
            created_at,
            start_date: None,
            end_date: None,
            total_value: Decimal::ZERO,
            payment_terms: "net_30".to_string(),
            currency: "USD".to_string(),
            estimated_hours: None,
            actual_hours: None,
            deliverables: Vec::new(),
            milestones: Vec::new(),
            compliance_status: ComplianceStatus::default(),
            compliance_score: 0.0,
            compliance_requirements: Vec::new(),
            administrative_burden_score: 0.0,
            exclusivity_clause: false,
            location_requirements: None,
            equipment_provided: false,
            supervision_level: SupervisionLevel::default(),
        }
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_id(mut self, id: ContractId) -> Self {
        self.id = id;
        self
    }

    /// Set the working period
    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    /// Move to `next`, enforcing the lifecycle
    pub fn transition_to(&mut self, next: ContractStatus) -> EntityResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EntityError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance_status == ComplianceStatus::Compliant
    }

    /// Returns true if the contract is active and its end date is strictly
    /// before `today`
    pub fn is_due_for_completion(&self, today: NaiveDate) -> bool {
        self.is_active() && self.end_date.is_some_and(|end| end < today)
    }

    /// Sum of milestone amounts not yet completed; `None` on overflow
    pub fn outstanding_milestone_value(&self) -> Option<Money> {
        checked_sum(
            self.milestones
                .iter()
                .filter(|m| !m.completed)
                .map(|m| m.amount),
        )
    }

    /// Check bounded, monetary and date attributes
    pub fn validate(&self) -> EntityResult<()> {
        check_non_negative_money("total_value", self.total_value)?;
        check_unit_interval("compliance_score", self.compliance_score)?;
        check_non_negative("administrative_burden_score", self.administrative_burden_score)?;
        if let Some(hours) = self.estimated_hours {
            check_non_negative("estimated_hours", hours)?;
        }
        if let Some(hours) = self.actual_hours {
            check_non_negative("actual_hours", hours)?;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(EntityError::OutOfRange {
                    field: "end_date",
                    value: end.to_string(),
                    expected: "on or after start_date",
                });
            }
        }
        Ok(())
    }
}
