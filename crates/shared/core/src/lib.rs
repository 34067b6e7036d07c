//! SB 988 Core Domain
//!
//! Pure entity model for the freelancer-market simulator: freelancers,
//! clients, contracts, transactions and the market snapshot rollup.
//! This crate contains no I/O and no simulation logic; it is the vocabulary
//! every other crate operates on.

#[macro_use]
mod macros;

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Client,
    ClientId,
    ClientType,
    CompliancePreference,
    CompliancePriority,
    ComplianceStatus,
    Contract,
    ContractId,
    ContractStatus,
    Freelancer,
    FreelancerId,
    FreelancerType,
    MarketConditions,
    MarketSnapshot,
    Milestone,
    SupervisionLevel,
    Transaction,
    TransactionId,
    TransactionStatus,
};
pub use error::{EntityError, EntityResult};
pub use values::{Money, Timestamp, checked_sum, generate_id};
