use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EntityResult;
use crate::values::{Money, Timestamp, check_non_negative_money, check_unit_interval};

/// Unique identifier for a client
pub type ClientId = Uuid;

closed_enum! {
    /// Client classification by organization characteristics
    pub enum ClientType: "client type" {
        SmallBusiness = "small_business",
        MediumEnterprise = "medium_enterprise",
        LargeCorporation = "large_corporation",
        Startup = "startup",
        NonProfit = "non_profit",
        Government = "government",
    }
}

closed_enum! {
    /// Priority tier a client gives to compliance work
    #[derive(Default)]
    pub enum CompliancePriority: "compliance priority" {
        High = "high",
        #[default]
        Medium = "medium",
        Low = "low",
    }
}

/// An organization hiring freelancers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    pub name: String,
    pub client_type: ClientType,
    pub industry: String,
    /// Employee count range, e.g. "10-49"
    pub size: String,
    pub location: String,
    pub created_at: Timestamp,

    // Financial attributes
    pub annual_revenue: Option<Money>,
    pub freelancer_spend_budget: Option<Money>,

    // Compliance posture
    pub sb988_awareness: f64,
    pub compliance_priority: CompliancePriority,
    pub legal_resources: f64,

    // Behavioral attributes (0-1)
    pub risk_aversion: f64,
    pub negotiation_power: f64,
    pub market_influence: f64,
}

impl Client {
    /// Create a client with a fresh random id and neutral attributes
    pub fn new(name: impl Into<String>, client_type: ClientType, created_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client_type,
            industry: String::new(),
            size: String::new(),
            location: String::new(),
            created_at,
            annual_revenue: None,
            freelancer_spend_budget: None,
            sb988_awareness: 0.5,
            compliance_priority: CompliancePriority::default(),
            legal_resources: 0.5,
            risk_aversion: 0.5,
            negotiation_power: 0.5,
            market_influence: 0.5,
        }
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Check every bounded and monetary attribute
    pub fn validate(&self) -> EntityResult<()> {
        if let Some(revenue) = self.annual_revenue {
            check_non_negative_money("annual_revenue", revenue)?;
        }
        if let Some(budget) = self.freelancer_spend_budget {
            check_non_negative_money("freelancer_spend_budget", budget)?;
        }
        check_unit_interval("sb988_awareness", self.sb988_awareness)?;
        check_unit_interval("legal_resources", self.legal_resources)?;
        check_unit_interval("risk_aversion", self.risk_aversion)?;
        check_unit_interval("negotiation_power", self.negotiation_power)?;
        check_unit_interval("market_influence", self.market_influence)
    }
}
