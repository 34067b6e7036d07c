use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EntityResult;
use crate::values::{
    Money, Timestamp, check_non_negative, check_non_negative_money, check_unit_interval,
};

/// Unique identifier for a freelancer
pub type FreelancerId = Uuid;

closed_enum! {
    /// Freelancer classification by work characteristics
    pub enum FreelancerType: "freelancer type" {
        IndependentContractor = "independent_contractor",
        GigWorker = "gig_worker",
        Consultant = "consultant",
        CreativeProfessional = "creative_professional",
        TechnicalSpecialist = "technical_specialist",
    }
}

closed_enum! {
    /// How a freelancer leans when compliance terms are negotiable
    #[derive(Default)]
    pub enum CompliancePreference: "compliance preference" {
        Strict = "strict",
        Flexible = "flexible",
        #[default]
        Neutral = "neutral",
    }
}

/// A freelancer in the simulated market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freelancer {
    id: FreelancerId,
    pub name: String,
    pub freelancer_type: FreelancerType,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub hourly_rate: Money,
    pub location: String,
    pub created_at: Timestamp,

    // Compliance attributes
    pub sb988_aware: bool,
    pub compliance_preference: CompliancePreference,
    /// Capacity to absorb administrative work (0-1)
    pub administrative_capacity: f64,

    // Economic attributes
    pub annual_income: Option<Money>,
    /// Share of income from the largest client (0-1)
    pub primary_client_dependency: f64,

    // Behavioral attributes (0-1)
    pub risk_tolerance: f64,
    pub negotiation_skill: f64,
    pub market_knowledge: f64,
}

impl Freelancer {
    /// Create a freelancer with a fresh random id and neutral attributes
    pub fn new(
        name: impl Into<String>,
        freelancer_type: FreelancerType,
        hourly_rate: Money,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            freelancer_type,
            skills: Vec::new(),
            experience_years: 0.0,
            hourly_rate,
            location: String::new(),
            created_at,
            sb988_aware: false,
            compliance_preference: CompliancePreference::default(),
            administrative_capacity: 0.5,
            annual_income: None,
            primary_client_dependency: 0.0,
            risk_tolerance: 0.5,
            negotiation_skill: 0.5,
            market_knowledge: 0.5,
        }
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_id(mut self, id: FreelancerId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> FreelancerId {
        self.id
    }

    /// Check every bounded and monetary attribute
    pub fn validate(&self) -> EntityResult<()> {
        check_non_negative("experience_years", self.experience_years)?;
        check_non_negative_money("hourly_rate", self.hourly_rate)?;
        if let Some(income) = self.annual_income {
            check_non_negative_money("annual_income", income)?;
        }
        check_unit_interval("administrative_capacity", self.administrative_capacity)?;
        check_unit_interval("primary_client_dependency", self.primary_client_dependency)?;
        check_unit_interval("risk_tolerance", self.risk_tolerance)?;
        check_unit_interval("negotiation_skill", self.negotiation_skill)?;
        check_unit_interval("market_knowledge", self.market_knowledge)
    }
}
