//! Polarity Channels
//!
//! The five named ternary channels, in digit order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::NumeralError;

/// One of the five polarity channels.
///
/// The discriminant is the channel's digit position inside a
/// [`Pentuple`](crate::Pentuple) (least significant first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Absorb = 0,
    Listen = 1,
    Execute = 2,
    Mediate = 3,
    Emit = 4,
}

impl Channel {
    /// All channels in digit order.
    pub const ALL: [Channel; 5] = [
        Channel::Absorb,
        Channel::Listen,
        Channel::Execute,
        Channel::Mediate,
        Channel::Emit,
    ];

    /// Digit position of this channel.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Absorb => write!(f, "absorb"),
            Channel::Listen => write!(f, "listen"),
            Channel::Execute => write!(f, "execute"),
            Channel::Mediate => write!(f, "mediate"),
            Channel::Emit => write!(f, "emit"),
        }
    }
}

impl FromStr for Channel {
    type Err = NumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absorb" => Ok(Channel::Absorb),
            "listen" => Ok(Channel::Listen),
            "execute" => Ok(Channel::Execute),
            "mediate" => Ok(Channel::Mediate),
            "emit" => Ok(Channel::Emit),
            _ => Err(NumeralError::UnknownName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_matches_digits() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("Mediate".parse::<Channel>().unwrap(), Channel::Mediate);
        assert_eq!(Channel::Emit.to_string(), "emit");
        assert!("vibrate".parse::<Channel>().is_err());
    }
}
