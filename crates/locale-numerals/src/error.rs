//! Numeral Errors

use thiserror::Error;

/// Error type for constructing or parsing numerals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    /// A ternary digit outside {-1, 0, 1}.
    #[error("invalid ternary digit {0}, expected -1, 0 or 1")]
    InvalidTrit(i8),
    /// A binary digit outside {0, 1}.
    #[error("invalid binary digit {0}, expected 0 or 1")]
    InvalidBit(u8),
    /// A packed pentuple number outside [0, 242].
    #[error("pentuple number {0} out of range 0..=242")]
    PentupleOutOfRange(u16),
    /// A packed hexagram number outside [0, 63].
    #[error("hexagram number {0} out of range 0..=63")]
    HexagramOutOfRange(u16),
    /// A character outside the hexagram glyph block.
    #[error("'{0}' is not a hexagram glyph")]
    NotAGlyph(char),
    /// Unparseable channel or state name.
    #[error("unknown name: '{0}'")]
    UnknownName(String),
}
