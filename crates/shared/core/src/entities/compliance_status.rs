closed_enum! {
    /// SB 988 compliance determination for a contract
    #[derive(Default)]
    pub enum ComplianceStatus: "compliance status" {
        Compliant = "compliant",
        NonCompliant = "non_compliant",
        #[default]
        PendingReview = "pending_review",
        Disputed = "disputed",
    }
}

closed_enum! {
    /// How closely the client directs the work
    #[derive(Default)]
    pub enum SupervisionLevel: "supervision level" {
        #[default]
        Minimal = "minimal",
        Moderate = "moderate",
        High = "high",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompliancePreference, CompliancePriority};

    #[test]
    fn test_defaults_are_the_undetermined_values() {
        assert_eq!(ComplianceStatus::default(), ComplianceStatus::PendingReview);
        assert_eq!(SupervisionLevel::default(), SupervisionLevel::Minimal);
        assert_eq!(CompliancePreference::default(), CompliancePreference::Neutral);
        assert_eq!(CompliancePriority::default(), CompliancePriority::Medium);
    }
}
