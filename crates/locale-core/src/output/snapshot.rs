//! Frame Snapshots
//!
//! Read-only captures of a tree for external viewers. A frame lists every
//! physical body below a node plus what the node-level query sees.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use locale_numerals::{ExchangeState, HexagramReading};

use crate::components::PolarityTotals;
use crate::environment::{EnvironmentTree, NodeId, Sighting};
use crate::math::Vector3;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("frame_{:06}", sequence)
}

/// One body in a frame.
#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub id: NodeId,
    pub source: Option<NodeId>,
    pub position: Vector3,
    pub velocity: Vector3,
    pub radius: f64,
    pub time: u64,
    pub state: ExchangeState,
    pub polarity: PolarityTotals,
    /// Pentuple packing with the absorb-tied sign
    pub packed: i16,
    pub glyph: HexagramReading,
}

/// Everything a viewer needs to draw one tick.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub bodies: Vec<BodySnapshot>,
    /// Query from the origin with an unbounded radius
    pub sightings: Vec<Sighting>,
    pub global: Vec<Sighting>,
}

/// Captures the subtree under `node`.
pub fn capture(tree: &EnvironmentTree, node: NodeId, tick: u64, sequence: u64) -> FrameSnapshot {
    let bodies = tree
        .subtree(node)
        .into_iter()
        .filter_map(|id| {
            let info = tree.information(id)?;
            let locale = info.locale.as_ref()?;
            Some(BodySnapshot {
                id,
                source: info.source(),
                position: locale.position,
                velocity: locale.velocity,
                radius: info.radius,
                time: locale.time,
                state: info.state,
                polarity: info.polarity().totals(),
                packed: info.polarity().as_pentuple(),
                glyph: info.polarity().as_hexagram(),
            })
        })
        .collect();

    FrameSnapshot {
        snapshot_id: generate_snapshot_id(sequence),
        tick,
        bodies,
        sightings: tree.locale_information(node, Vector3::ZERO, f64::INFINITY),
        global: tree.global_information(node),
    }
}

/// Append-only JSONL frame writer
pub struct SnapshotWriter {
    writer: BufWriter<File>,
    frame_count: u64,
}

impl SnapshotWriter {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            frame_count: 0,
        })
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn write(&mut self, frame: &FrameSnapshot) -> std::io::Result<()> {
        let json = serde_json::to_string(frame)?;
        writeln!(self.writer, "{}", json)?;
        self.frame_count += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
