//! Locale Engine Library
//!
//! A hierarchy of environments carrying ternary polarity, with
//! occlusion-aware visibility queries and a queued integration pass.

pub mod components;
pub mod config;
pub mod environment;
pub mod events;
pub mod math;
pub mod output;
pub mod setup;

pub use components::{Information, Locale, Polarity, PolarityTotals};
pub use config::{ConfigError, DegeneratePolicy, EngineConfig, PhysicsConfig};
pub use environment::{Environment, EnvironmentError, EnvironmentTree, NodeId, Sighting};
pub use events::{ChangeNotice, LogSink, MutationLog, NullSink, TracingSink};
pub use math::{Ray, Vector2, Vector3};

pub use locale_numerals::{Channel, ExchangeState, Hexagram, HexagramReading, Pentuple};
