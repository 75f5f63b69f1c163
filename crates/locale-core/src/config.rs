//! Configuration System
//!
//! Engine settings loaded from a TOML file. Every section and field has a
//! default, so a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "locale.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run length and scenario shape
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Integration and visibility settings
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Snapshot and log output
    #[serde(default)]
    pub output: OutputConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes this configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Simulation run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of update passes to run
    pub ticks: u64,
    /// Queue a pass every this many ticks
    pub flush_interval: u64,
    /// Seed for scenario generation
    pub seed: u64,
    /// Number of physical bodies in the generated scenario
    pub bodies: usize,
    /// Number of virtual field nodes in the generated scenario
    pub fields: usize,
    /// Half-width of the cube bodies are scattered in
    pub spread: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 100,
            flush_interval: 1,
            seed: 42,
            bodies: 8,
            fields: 1,
            spread: 10.0,
        }
    }
}

/// How degenerate arithmetic is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Non-positive mass is rejected at insertion and contributes no
    /// acceleration.
    #[default]
    Guard,
    /// Let NaN and infinity from degenerate mass flow through integration.
    Propagate,
}

/// Integration and visibility settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Radius used to find observers when a body emits a change notice
    pub view_radius: f64,
    /// Bounding radius for generated bodies
    pub default_radius: f64,
    /// Mass for generated bodies
    pub default_mass: f64,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            view_radius: 25.0,
            default_radius: 1.0,
            default_mass: 1.0,
            degenerate_policy: DegeneratePolicy::Guard,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSONL file receiving frame snapshots
    pub snapshot_path: Option<PathBuf>,
    /// Write a frame every this many ticks
    pub snapshot_interval: u64,
    /// JSONL file receiving structural-mutation messages
    pub mutation_log_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            snapshot_interval: 10,
            mutation_log_path: None,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.physics.degenerate_policy, DegeneratePolicy::Guard);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_str(
            r#"
            [simulation]
            ticks = 5
            bodies = 2

            [physics]
            degenerate_policy = "propagate"
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.ticks, 5);
        assert_eq!(config.simulation.bodies, 2);
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.physics.degenerate_policy, DegeneratePolicy::Propagate);
        assert_eq!(config.physics.view_radius, 25.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.output.snapshot_path = Some(PathBuf::from("out/frames.jsonl"));
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[physics]\nview_radius = 3.5").unwrap();
        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.physics.view_radius, 3.5);

        let missing = EngineConfig::from_file(Path::new("/nonexistent/locale.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
        assert!(matches!(
            EngineConfig::from_str("[physics]\nview_radius = \"far\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
