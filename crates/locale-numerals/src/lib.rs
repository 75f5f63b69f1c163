//! Ternary and binary numerals for polarity state.
//!
//! This crate contains pure value types with no simulation logic.
//! `locale-core` builds polarity storage and physics on top of it.
//!
//! - [`Pentuple`]: five balanced-ternary digits packed into `0..=242`
//! - [`Hexagram`]: six bits packed into `0..=63`, shown as a Yijing glyph
//! - [`HexagramReading`]: the ternary-to-binary bridge with its sign marker
//! - [`ExchangeState`]: the five-phase exchange ring

pub mod channel;
pub mod error;
pub mod exchange;
pub mod hexagram;
pub mod pentuple;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use channel::Channel;
pub use error::NumeralError;
pub use exchange::{ExchangeState, PHASES_PER_CYCLE};
pub use hexagram::{Hexagram, HexagramReading, HEXAGRAM_BASE, HEXAGRAM_MAX, SIGN_MARKER};
pub use pentuple::{clamp_trit, Pentuple, CHANGED, PENTUPLE_MAX};
