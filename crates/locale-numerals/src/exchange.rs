//! Exchange States
//!
//! The fixed five-phase ring every physical exchange walks through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::NumeralError;

/// Number of phases in one exchange cycle.
pub const PHASES_PER_CYCLE: usize = 5;

/// Phase of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    #[default]
    Emission,
    Absorption,
    Vibration,
    Execution,
    Mediation,
}

impl ExchangeState {
    /// Returns the next phase in the ring.
    pub fn next(self) -> Self {
        match self {
            ExchangeState::Emission => ExchangeState::Absorption,
            ExchangeState::Absorption => ExchangeState::Vibration,
            ExchangeState::Vibration => ExchangeState::Execution,
            ExchangeState::Execution => ExchangeState::Mediation,
            ExchangeState::Mediation => ExchangeState::Emission,
        }
    }

    /// Steps this state forward in place and returns the new phase.
    pub fn advance(&mut self) -> Self {
        *self = self.next();
        *self
    }

    /// Returns true for the phase that closes a cycle.
    pub fn is_cycle_end(self) -> bool {
        matches!(self, ExchangeState::Mediation)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Emission => write!(f, "emission"),
            ExchangeState::Absorption => write!(f, "absorption"),
            ExchangeState::Vibration => write!(f, "vibration"),
            ExchangeState::Execution => write!(f, "execution"),
            ExchangeState::Mediation => write!(f, "mediation"),
        }
    }
}

impl FromStr for ExchangeState {
    type Err = NumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emission" => Ok(ExchangeState::Emission),
            "absorption" => Ok(ExchangeState::Absorption),
            "vibration" => Ok(ExchangeState::Vibration),
            "execution" => Ok(ExchangeState::Execution),
            "mediation" => Ok(ExchangeState::Mediation),
            _ => Err(NumeralError::UnknownName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_order() {
        let mut state = ExchangeState::default();
        let visited: Vec<_> = (0..PHASES_PER_CYCLE).map(|_| state.advance()).collect();
        assert_eq!(
            visited,
            vec![
                ExchangeState::Absorption,
                ExchangeState::Vibration,
                ExchangeState::Execution,
                ExchangeState::Mediation,
                ExchangeState::Emission,
            ]
        );
        assert_eq!(state, ExchangeState::Emission);
    }

    #[test]
    fn test_cycle_end() {
        assert!(ExchangeState::Mediation.is_cycle_end());
        assert!(!ExchangeState::Emission.is_cycle_end());
    }

    #[test]
    fn test_parse_round_trip() {
        for s in ["emission", "absorption", "vibration", "execution", "mediation"] {
            let state: ExchangeState = s.parse().unwrap();
            assert_eq!(state.to_string(), s);
        }
        assert!("collapse".parse::<ExchangeState>().is_err());
    }
}
