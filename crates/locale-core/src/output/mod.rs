//! Output
//!
//! Frame snapshots for viewers.

pub mod snapshot;

pub use snapshot::{capture, generate_snapshot_id, BodySnapshot, FrameSnapshot, SnapshotWriter};
