//! Scenario Setup
//!
//! Tree construction for demos and tests.

pub mod scenario;

pub use scenario::{build_scenario, two_body, ScenarioSummary};
