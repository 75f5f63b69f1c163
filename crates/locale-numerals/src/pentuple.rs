//! Pentuple Numbers
//!
//! A five-digit balanced ternary number. Each digit is one of -1, 0, 1 and is
//! stored shifted to 0, 1, 2 when packed, so the packed form is a plain base-3
//! integer in `0..=242`.
//!
//! # Example
//!
//! ```
//! use locale_numerals::Pentuple;
//!
//! let p = Pentuple::decompose(121).unwrap();
//! assert_eq!(p.digits(), [0, 0, 0, 0, 0]);
//! assert_eq!(p.number(), 121);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{Channel, Hexagram, HexagramReading, NumeralError};

/// Largest packed pentuple number (`3^5 - 1`).
pub const PENTUPLE_MAX: u8 = 242;

/// Digit value that marks a changed position after [`Pentuple::compare`].
pub const CHANGED: i8 = 1;

/// Snaps a real value onto a ternary digit.
///
/// Values below -0.5 become -1, values above 0.5 become 1, everything in
/// between (inclusive) becomes 0. NaN snaps to 0.
pub fn clamp_trit(value: f64) -> i8 {
    if value < -0.5 {
        -1
    } else if value > 0.5 {
        1
    } else {
        0
    }
}

/// Five ternary digits a..e, least significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pentuple {
    digits: [i8; 5],
}

impl Pentuple {
    /// Creates a pentuple from explicit digits.
    pub fn new(digits: [i8; 5]) -> Result<Self, NumeralError> {
        if let Some(bad) = digits.iter().find(|d| !(-1..=1).contains(*d)) {
            return Err(NumeralError::InvalidTrit(*bad));
        }
        Ok(Self { digits })
    }

    /// The all-zero pentuple.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Unpacks a base-3 number into its five digits.
    pub fn decompose(number: u16) -> Result<Self, NumeralError> {
        if number > u16::from(PENTUPLE_MAX) {
            return Err(NumeralError::PentupleOutOfRange(number));
        }
        let mut n = number;
        let mut digits = [0i8; 5];
        for digit in digits.iter_mut() {
            *digit = (n % 3) as i8 - 1;
            n /= 3;
        }
        Ok(Self { digits })
    }

    /// Packs the digits back into a base-3 number.
    pub fn number(&self) -> u8 {
        self.digits
            .iter()
            .rev()
            .fold(0u8, |acc, d| acc * 3 + (d + 1) as u8)
    }

    /// All five digits, least significant first.
    pub fn digits(&self) -> [i8; 5] {
        self.digits
    }

    /// The digit backing `channel`.
    pub fn digit(&self, channel: Channel) -> i8 {
        self.digits[channel.index()]
    }

    /// Returns a copy with `channel` replaced by `digit`.
    pub fn with_digit(self, channel: Channel, digit: i8) -> Result<Self, NumeralError> {
        if !(-1..=1).contains(&digit) {
            return Err(NumeralError::InvalidTrit(digit));
        }
        let mut digits = self.digits;
        digits[channel.index()] = digit;
        Ok(Self { digits })
    }

    /// Returns a copy with `channel` set to `value` snapped by [`clamp_trit`].
    pub fn with_clamped(self, channel: Channel, value: f64) -> Self {
        let mut digits = self.digits;
        digits[channel.index()] = clamp_trit(value);
        Self { digits }
    }

    /// Digit-wise state delta: agreeing digits are kept, disagreeing digits
    /// become [`CHANGED`].
    pub fn compare(&self, other: &Pentuple) -> Pentuple {
        let mut digits = [0i8; 5];
        for (i, digit) in digits.iter_mut().enumerate() {
            *digit = if self.digits[i] == other.digits[i] {
                self.digits[i]
            } else {
                CHANGED
            };
        }
        Pentuple { digits }
    }

    /// Same law as [`compare`](Self::compare).
    pub fn evolve(&self, other: &Pentuple) -> Pentuple {
        self.compare(other)
    }

    /// True if any digit is -1.
    pub fn is_negative(&self) -> bool {
        self.digits.contains(&-1)
    }

    /// Binary projection: bit i is set iff digit i is 1; the sign marker is
    /// raised iff any digit is -1. Bit 5 is always clear.
    pub fn hexagram_number(&self) -> HexagramReading {
        let mut bits = [0u8; 6];
        for (i, d) in self.digits.iter().enumerate() {
            bits[i] = u8::from(*d == 1);
        }
        HexagramReading {
            hexagram: Hexagram::from_bits(bits),
            negative: self.is_negative(),
        }
    }
}

impl fmt::Display for Pentuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.digits.iter().rev() {
            let c = match d {
                -1 => '-',
                0 => '0',
                _ => '+',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

// Serialized as the packed number.
impl Serialize for Pentuple {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Pentuple {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = u16::deserialize(deserializer)?;
        Pentuple::decompose(n).map_err(serde::de::Error::custom)
    }
}
