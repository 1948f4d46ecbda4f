//! Discussion mode and turn budget

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Smallest configurable number of exchange pairs
pub const MIN_FIXED_TURNS: u8 = 1;
/// Largest configurable number of exchange pairs
pub const MAX_FIXED_TURNS: u8 = 5;
/// Exchange pairs used when nothing is configured
pub const DEFAULT_FIXED_TURNS: u8 = 2;
/// Safety ceiling on exchange pairs in agreement-driven mode
pub const AGREEMENT_TURN_CEILING: u8 = 10;

/// How a debate decides to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionMode {
    /// A configured number of exchange pairs; stop signals are ignored
    #[default]
    FixedTurns,
    /// Ends when both personas signal stop on consecutive turns
    AgreementDriven,
}

impl DiscussionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionMode::FixedTurns => "fixed_turns",
            DiscussionMode::AgreementDriven => "agreement_driven",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DiscussionMode::FixedTurns => "Fixed turns",
            DiscussionMode::AgreementDriven => "Agreement driven",
        }
    }

    pub fn honours_stop_signals(&self) -> bool {
        matches!(self, DiscussionMode::AgreementDriven)
    }
}

impl std::fmt::Display for DiscussionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for DiscussionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fixed" | "fixed_turns" => Ok(DiscussionMode::FixedTurns),
            "agreement" | "agreement_driven" | "ai" => Ok(DiscussionMode::AgreementDriven),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

/// Maximum number of exchange pairs for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnBudget {
    pairs: u8,
}

impl TurnBudget {
    /// User-configured budget for fixed-turn mode
    pub fn fixed(pairs: u8) -> Result<Self, DomainError> {
        if !(MIN_FIXED_TURNS..=MAX_FIXED_TURNS).contains(&pairs) {
            return Err(DomainError::InvalidTurnCount {
                min: MIN_FIXED_TURNS,
                max: MAX_FIXED_TURNS,
                actual: pairs,
            });
        }
        Ok(Self { pairs })
    }

    /// Non-configurable ceiling for agreement-driven mode
    pub fn agreement_ceiling() -> Self {
        Self {
            pairs: AGREEMENT_TURN_CEILING,
        }
    }

    /// Budget a run in `mode` should use, given the configured fixed count
    pub fn for_mode(mode: DiscussionMode, fixed: TurnBudget) -> Self {
        match mode {
            DiscussionMode::FixedTurns => fixed,
            DiscussionMode::AgreementDriven => Self::agreement_ceiling(),
        }
    }

    pub fn pairs(&self) -> u8 {
        self.pairs
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_FIXED_TURNS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "fixed".parse::<DiscussionMode>().unwrap(),
            DiscussionMode::FixedTurns
        );
        assert_eq!(
            "Agreement-Driven".parse::<DiscussionMode>().unwrap(),
            DiscussionMode::AgreementDriven
        );
        assert!("forever".parse::<DiscussionMode>().is_err());
    }

    #[test]
    fn test_fixed_budget_bounds() {
        assert!(TurnBudget::fixed(0).is_err());
        assert_eq!(TurnBudget::fixed(1).unwrap().pairs(), 1);
        assert_eq!(TurnBudget::fixed(5).unwrap().pairs(), 5);
        assert_eq!(
            TurnBudget::fixed(6),
            Err(DomainError::InvalidTurnCount {
                min: 1,
                max: 5,
                actual: 6
            })
        );
    }

    #[test]
    fn test_agreement_ignores_configured_count() {
        let fixed = TurnBudget::fixed(1).unwrap();
        let budget = TurnBudget::for_mode(DiscussionMode::AgreementDriven, fixed);
        assert_eq!(budget.pairs(), AGREEMENT_TURN_CEILING);
        assert_eq!(
            TurnBudget::for_mode(DiscussionMode::FixedTurns, fixed).pairs(),
            1
        );
    }

    #[test]
    fn test_only_agreement_mode_honours_stop() {
        assert!(DiscussionMode::AgreementDriven.honours_stop_signals());
        assert!(!DiscussionMode::FixedTurns.honours_stop_signals());
    }
}
