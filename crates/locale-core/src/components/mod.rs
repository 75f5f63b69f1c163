//! Node Components
//!
//! State payloads attached to environment nodes.

pub mod information;
pub mod polarity;

pub use information::{Information, Locale};
pub use polarity::{Polarity, PolarityTotals};
