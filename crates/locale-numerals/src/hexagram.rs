//! Hexagram Numbers
//!
//! A six-digit binary number shown as one symbol from the Yijing hexagram
//! block (`U+4DC0..=U+4DFF`).
//!
//! # Example
//!
//! ```
//! use locale_numerals::Hexagram;
//!
//! let h = Hexagram::decompose(0).unwrap();
//! assert_eq!(h.glyph(), '\u{4DC0}');
//! assert_eq!(Hexagram::from_glyph('\u{4DFF}').unwrap().number(), 63);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{NumeralError, Pentuple};

/// First codepoint of the hexagram glyph block.
pub const HEXAGRAM_BASE: u32 = 0x4DC0;

/// Largest packed hexagram number (`2^6 - 1`).
pub const HEXAGRAM_MAX: u8 = 63;

/// Text marker placed before a glyph whose ternary source had a negative digit.
pub const SIGN_MARKER: char = '-';

/// Six binary digits a..f, least significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hexagram {
    bits: [u8; 6],
}

impl Hexagram {
    /// Creates a hexagram from explicit digits.
    pub fn new(bits: [u8; 6]) -> Result<Self, NumeralError> {
        if let Some(bad) = bits.iter().find(|b| **b > 1) {
            return Err(NumeralError::InvalidBit(*bad));
        }
        Ok(Self { bits })
    }

    pub(crate) fn from_bits(bits: [u8; 6]) -> Self {
        Self { bits }
    }

    /// Unpacks a number in `0..=63` into six bits.
    pub fn decompose(number: u16) -> Result<Self, NumeralError> {
        if number > u16::from(HEXAGRAM_MAX) {
            return Err(NumeralError::HexagramOutOfRange(number));
        }
        let mut n = number;
        let mut bits = [0u8; 6];
        for bit in bits.iter_mut() {
            *bit = (n % 2) as u8;
            n /= 2;
        }
        Ok(Self { bits })
    }

    /// Packs the bits back into a number.
    pub fn number(&self) -> u8 {
        self.bits.iter().rev().fold(0u8, |acc, b| acc * 2 + b)
    }

    pub fn bits(&self) -> [u8; 6] {
        self.bits
    }

    /// Bit-wise state delta: agreeing bits are kept, disagreeing bits become 1.
    pub fn compare(&self, other: &Hexagram) -> Hexagram {
        let mut bits = [0u8; 6];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = if self.bits[i] == other.bits[i] {
                self.bits[i]
            } else {
                1
            };
        }
        Hexagram { bits }
    }

    /// The glyph for this number.
    pub fn glyph(&self) -> char {
        char::from_u32(HEXAGRAM_BASE + u32::from(self.number()))
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub fn from_glyph(glyph: char) -> Result<Self, NumeralError> {
        let offset = (glyph as u32)
            .checked_sub(HEXAGRAM_BASE)
            .filter(|o| *o <= u32::from(HEXAGRAM_MAX))
            .ok_or(NumeralError::NotAGlyph(glyph))?;
        Self::decompose(offset as u16)
    }

    /// Decomposes a glyph and repacks it unchanged.
    ///
    /// This is an identity transform on valid glyphs; it only rejects
    /// characters outside the block.
    pub fn evolve(glyph: char) -> Result<char, NumeralError> {
        let hexagram = Self::from_glyph(glyph)?;
        let repacked = Self::decompose(u16::from(hexagram.number()))?;
        Ok(repacked.glyph())
    }
}

impl fmt::Display for Hexagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

// Serialized as the glyph.
impl Serialize for Hexagram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_char(self.glyph())
    }
}

impl<'de> Deserialize<'de> for Hexagram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let c = char::deserialize(deserializer)?;
        Hexagram::from_glyph(c).map_err(serde::de::Error::custom)
    }
}

/// A hexagram produced from ternary state, with an optional sign marker.
///
/// The sign is not a seventh bit; it only records that the ternary source
/// carried a negative value the binary form cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexagramReading {
    pub hexagram: Hexagram,
    pub negative: bool,
}

impl HexagramReading {
    pub fn new(hexagram: Hexagram, negative: bool) -> Self {
        Self { hexagram, negative }
    }

    /// Lifts the reading back into ternary digits.
    ///
    /// Set bits become 1, clear bits 0. A negative reading turns the first
    /// digit to -1 when it is not already set; bit 5 has no ternary digit.
    pub fn to_pentuple(&self) -> Pentuple {
        let bits = self.hexagram.bits();
        let mut digits = [0i8; 5];
        for (i, digit) in digits.iter_mut().enumerate() {
            *digit = bits[i] as i8;
        }
        if self.negative && digits[0] == 0 {
            digits[0] = -1;
        }
        Pentuple::new(digits).unwrap_or_default()
    }
}

impl fmt::Display for HexagramReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "{}", SIGN_MARKER)?;
        }
        write!(f, "{}", self.hexagram)
    }
}

impl FromStr for HexagramReading {
    type Err = NumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match s.strip_prefix(SIGN_MARKER) {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self {
                hexagram: Hexagram::from_glyph(c)?,
                negative,
            }),
            _ => Err(NumeralError::UnknownName(s.to_string())),
        }
    }
}

impl Serialize for HexagramReading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexagramReading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_number() {
        for n in 0..=u16::from(HEXAGRAM_MAX) {
            let h = Hexagram::decompose(n).unwrap();
            assert_eq!(u16::from(h.number()), n);
            assert_eq!(Hexagram::from_glyph(h.glyph()).unwrap(), h);
        }
    }

    #[test]
    fn test_glyph_block_edges() {
        assert_eq!(Hexagram::decompose(0).unwrap().glyph(), '䷀');
        assert_eq!(Hexagram::decompose(63).unwrap().glyph(), '䷿');
        assert_eq!(
            Hexagram::from_glyph('a'),
            Err(NumeralError::NotAGlyph('a'))
        );
        assert_eq!(
            Hexagram::from_glyph('\u{4E00}'),
            Err(NumeralError::NotAGlyph('\u{4E00}'))
        );
    }

    #[test]
    fn test_compare() {
        let a = Hexagram::new([0, 0, 1, 1, 0, 1]).unwrap();
        let b = Hexagram::new([0, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(a.compare(&b).bits(), [0, 1, 1, 1, 0, 1]);
        assert!(Hexagram::new([0, 2, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_evolve_is_identity() {
        for n in 0..=u16::from(HEXAGRAM_MAX) {
            let glyph = Hexagram::decompose(n).unwrap().glyph();
            assert_eq!(Hexagram::evolve(glyph).unwrap(), glyph);
        }
        assert!(Hexagram::evolve('x').is_err());
    }

    #[test]
    fn test_reading_display_and_parse() {
        let reading = HexagramReading::new(Hexagram::decompose(5).unwrap(), true);
        let text = reading.to_string();
        assert!(text.starts_with(SIGN_MARKER));
        assert_eq!(text.parse::<HexagramReading>().unwrap(), reading);

        let plain = HexagramReading::new(Hexagram::decompose(5).unwrap(), false);
        assert_eq!(plain.to_string(), "\u{4DC5}");
        assert!("".parse::<HexagramReading>().is_err());
        assert!("-䷀䷀".parse::<HexagramReading>().is_err());
    }

    #[test]
    fn test_reading_to_pentuple() {
        let reading = HexagramReading::new(Hexagram::decompose(0b10110).unwrap(), true);
        assert_eq!(reading.to_pentuple().digits(), [-1, 1, 1, 0, 1]);

        let positive = Pentuple::new([1, 0, 0, 1, 0]).unwrap();
        assert_eq!(positive.hexagram_number().to_pentuple(), positive);
    }

    #[test]
    fn test_serde_glyph() {
        let h = Hexagram::decompose(42).unwrap();
        let json = serde_json::to_string(&h).unwrap();
        let back: Hexagram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);

        let reading = HexagramReading::new(h, true);
        let json = serde_json::to_string(&reading).unwrap();
        let back: HexagramReading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }
}
