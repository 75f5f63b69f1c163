//! Sample numerals for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // locale-numerals = { path = "../locale-numerals", features = ["test-fixtures"] }
//!
//! use locale_numerals::fixtures;
//!
//! let attractor = fixtures::preset("attractor");
//! ```

use serde::Deserialize;

use crate::Pentuple;

/// A named polarity preset.
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    pub name: String,
    pub pentuple: Pentuple,
}

/// Returns the sample presets from the fixtures file.
///
/// Contains 5 presets:
/// - neutral (all channels 0)
/// - attractor (absorb -1, rest 0)
/// - repeller (absorb 1, rest 0)
/// - saturated (all channels 1)
/// - inverted (all channels -1)
pub fn sample_presets() -> Vec<Preset> {
    let json = include_str!("../tests/fixtures/sample_presets.json");
    serde_json::from_str(json).expect("Failed to parse sample_presets.json")
}

/// Looks up one preset by name.
///
/// # Panics
///
/// Panics if no preset has that name.
pub fn preset(name: &str) -> Pentuple {
    sample_presets()
        .into_iter()
        .find(|p| p.name == name)
        .map(|p| p.pentuple)
        .unwrap_or_else(|| panic!("No preset named '{}'", name))
}
