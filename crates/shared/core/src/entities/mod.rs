mod client;
mod compliance_status;
mod contract;
mod contract_status;
mod freelancer;
mod market_snapshot;
mod transaction;

pub use client::{Client, ClientId, ClientType, CompliancePriority};
pub use compliance_status::{ComplianceStatus, SupervisionLevel};
pub use contract::{Contract, ContractId, Milestone};
pub use contract_status::ContractStatus;
pub use freelancer::{CompliancePreference, Freelancer, FreelancerId, FreelancerType};
pub use market_snapshot::{MarketConditions, MarketSnapshot};
pub use transaction::{Transaction, TransactionId, TransactionStatus};
