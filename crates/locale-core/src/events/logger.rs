//! Mutation Logger
//!
//! Fire-and-forget sinks for structural-mutation messages. The tree calls
//! [`LogSink::log`] and never looks at the outcome; sinks that can fail
//! report through `tracing` and carry on.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Receiver for structural-mutation messages.
pub trait LogSink {
    fn log(&mut self, message: &str);
}

/// Default sink: forwards every message to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, message: &str) {
        tracing::info!(target: "locale_core::mutation", "{}", message);
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&mut self, _message: &str) {}
}

/// One line of a mutation log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEntry {
    pub seq: u64,
    pub message: String,
}

/// Append-only JSONL mutation log
pub struct MutationLog {
    writer: Option<BufWriter<File>>,
    entry_count: u64,
    next_seq: u64,
}

impl MutationLog {
    /// Create a new mutation log writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            entry_count: 0,
            next_seq: 1,
        })
    }

    /// Create a log that discards entries (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            entry_count: 0,
            next_seq: 1,
        }
    }

    /// Get the number of entries seen
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Write one entry to the file
    pub fn try_log(&mut self, message: &str) -> std::io::Result<()> {
        self.entry_count += 1;
        let entry = MutationEntry {
            seq: self.next_seq,
            message: message.to_string(),
        };
        self.next_seq += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl LogSink for MutationLog {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.try_log(message) {
            tracing::warn!("Failed to write mutation log entry: {}", e);
        }
    }
}

impl Drop for MutationLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush mutation log: {}", e);
        }
    }
}
