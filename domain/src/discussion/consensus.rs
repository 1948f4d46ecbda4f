//! Two-persona stop agreement
//!
//! A single stop signal only marks agreement as pending. The discussion is
//! over when the *next* turn, taken by the other persona, also signals stop.
//! Any turn without a signal clears the pending state.

use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Agreement state across consecutive turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConsensusState {
    /// Nobody is currently proposing to stop
    #[default]
    None,
    /// The given persona signalled on the most recent turn
    OnePending(Persona),
    /// Both personas signalled on consecutive turns
    Reached,
}

impl ConsensusState {
    /// Fold one parsed turn into the state.
    ///
    /// `Reached` is terminal for the run.
    pub fn observe(self, persona: Persona, stop_signaled: bool) -> Self {
        match (self, stop_signaled) {
            (ConsensusState::Reached, _) => ConsensusState::Reached,
            (_, false) => ConsensusState::None,
            (ConsensusState::OnePending(prev), true) if prev != persona => ConsensusState::Reached,
            (_, true) => ConsensusState::OnePending(persona),
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, ConsensusState::Reached)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConsensusState::OnePending(_))
    }
}

impl std::fmt::Display for ConsensusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusState::None => write!(f, "None"),
            ConsensusState::OnePending(p) => write!(f, "Pending ({})", p),
            ConsensusState::Reached => write!(f, "Reached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Persona::{Creative, Logical};

    #[test]
    fn test_single_signal_is_pending() {
        let state = ConsensusState::None.observe(Logical, true);
        assert_eq!(state, ConsensusState::OnePending(Logical));
        assert!(!state.is_reached());
    }

    #[test]
    fn test_consecutive_signals_from_both_reach() {
        let state = ConsensusState::None
            .observe(Logical, true)
            .observe(Creative, true);
        assert!(state.is_reached());
    }

    #[test]
    fn test_silence_clears_pending() {
        let state = ConsensusState::None
            .observe(Logical, true)
            .observe(Creative, false);
        assert_eq!(state, ConsensusState::None);
    }

    #[test]
    fn test_same_persona_twice_stays_pending() {
        let state = ConsensusState::OnePending(Creative).observe(Creative, true);
        assert_eq!(state, ConsensusState::OnePending(Creative));
    }

    #[test]
    fn test_reached_is_terminal() {
        let state = ConsensusState::Reached.observe(Logical, false);
        assert!(state.is_reached());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConsensusState::None.to_string(), "None");
        assert_eq!(
            ConsensusState::OnePending(Creative).to_string(),
            "Pending (Muse)"
        );
        assert_eq!(ConsensusState::Reached.to_string(), "Reached");
    }
}
