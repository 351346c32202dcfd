//! Donation lifecycle state machine
//!
//! States: requested → confirmed → completed, with canceled reachable
//! from any non-terminal state. Completed and canceled are terminal.
//! Administrative updates may move a non-terminal donation to any other
//! defined status, including straight to completed.

use serde::{Deserialize, Serialize};

use hemolink_common::StateError;

/// Donation lifecycle states
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "donation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Requested,
    Confirmed,
    Completed,
    Canceled,
}

impl DonationStatus {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Get all valid next states from the current state
    pub fn valid_transitions(&self) -> &'static [DonationStatus] {
        match self {
            // Admins can jump a non-terminal donation to any other status
            Self::Requested => &[Self::Confirmed, Self::Completed, Self::Canceled],
            Self::Confirmed => &[Self::Requested, Self::Completed, Self::Canceled],
            Self::Completed => &[],
            Self::Canceled => &[],
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requested => write!(f, "requested"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

/// Donation state machine
pub struct DonationStateMachine;

impl DonationStateMachine {
    /// Attempt a state transition.
    ///
    /// Returns the new state if the transition is valid, or an error
    /// otherwise. Terminal states reject every transition, including
    /// no-op writes of the same status.
    pub fn transition(
        current: DonationStatus,
        target: DonationStatus,
    ) -> Result<DonationStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        if current == target {
            return Ok(current);
        }

        if current.valid_transitions().contains(&target) {
            Ok(target)
        } else {
            Err(StateError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let confirmed =
            DonationStateMachine::transition(DonationStatus::Requested, DonationStatus::Confirmed)
                .unwrap();
        assert_eq!(confirmed, DonationStatus::Confirmed);

        let completed =
            DonationStateMachine::transition(confirmed, DonationStatus::Completed).unwrap();
        assert_eq!(completed, DonationStatus::Completed);
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for current in [DonationStatus::Requested, DonationStatus::Confirmed] {
            let result = DonationStateMachine::transition(current, DonationStatus::Canceled);
            assert_eq!(result, Ok(DonationStatus::Canceled));
        }
    }

    #[test]
    fn test_direct_jump_to_completed() {
        // Admin walk-in flow: requested straight to completed
        let result =
            DonationStateMachine::transition(DonationStatus::Requested, DonationStatus::Completed);
        assert_eq!(result, Ok(DonationStatus::Completed));
    }

    #[test]
    fn test_confirmed_can_revert_to_requested() {
        let result =
            DonationStateMachine::transition(DonationStatus::Confirmed, DonationStatus::Requested);
        assert_eq!(result, Ok(DonationStatus::Requested));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [DonationStatus::Completed, DonationStatus::Canceled] {
            for target in [
                DonationStatus::Requested,
                DonationStatus::Confirmed,
                DonationStatus::Completed,
                DonationStatus::Canceled,
            ] {
                let result = DonationStateMachine::transition(terminal, target);
                assert!(matches!(result, Err(StateError::TerminalState(_))));
            }
        }
    }

    #[test]
    fn test_same_state_noop_is_allowed_when_not_terminal() {
        let result =
            DonationStateMachine::transition(DonationStatus::Requested, DonationStatus::Requested);
        assert_eq!(result, Ok(DonationStatus::Requested));
    }

    #[test]
    fn test_is_terminal() {
        assert!(!DonationStatus::Requested.is_terminal());
        assert!(!DonationStatus::Confirmed.is_terminal());
        assert!(DonationStatus::Completed.is_terminal());
        assert!(DonationStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_valid_transitions_from_terminal_are_empty() {
        assert!(DonationStatus::Completed.valid_transitions().is_empty());
        assert!(DonationStatus::Canceled.valid_transitions().is_empty());
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&DonationStatus::Requested).unwrap(),
            r#""requested""#
        );
        assert_eq!(
            serde_json::from_str::<DonationStatus>(r#""canceled""#).unwrap(),
            DonationStatus::Canceled
        );
    }
}
