closed_enum! {
    /// Contract lifecycle status
    pub enum ContractStatus: "contract status" {
        /// Drafted, not yet under negotiation
        Draft = "draft",
        /// Terms under negotiation
        Negotiating = "negotiating",
        /// Work in progress
        Active = "active",
        /// Ran to its end date
        Completed = "completed",
        /// Ended early by either party
        Terminated = "terminated",
        /// Under dispute, may resume or end
        Disputed = "disputed",
    }
}

impl ContractStatus {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Terminated)
    }

    /// Returns true if the lifecycle allows moving to `next`
    ///
    /// Staying in the same state is always allowed so repeated mutations
    /// are idempotent.
    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        use ContractStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Draft, Negotiating)
                | (Draft, Terminated)
                | (Negotiating, Active)
                | (Negotiating, Terminated)
                | (Active, Completed)
                | (Active, Terminated)
                | (Active, Disputed)
                | (Disputed, Active)
                | (Disputed, Completed)
                | (Disputed, Terminated)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        assert!(ContractStatus::Draft.can_transition_to(ContractStatus::Negotiating));
        assert!(ContractStatus::Negotiating.can_transition_to(ContractStatus::Active));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Completed));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Disputed));
    }

    #[test]
    fn test_no_skipping_negotiation() {
        assert!(!ContractStatus::Draft.can_transition_to(ContractStatus::Active));
        assert!(!ContractStatus::Negotiating.can_transition_to(ContractStatus::Completed));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        for terminal in [ContractStatus::Completed, ContractStatus::Terminated] {
            assert!(terminal.is_terminal());
            for next in ContractStatus::ALL {
                assert_eq!(terminal.can_transition_to(*next), *next == terminal);
            }
        }
        assert!(!ContractStatus::Disputed.is_terminal());
    }
}
