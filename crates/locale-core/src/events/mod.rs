//! Events
//!
//! Mutation log sinks and change notices.

pub mod logger;
pub mod notice;

pub use logger::{LogSink, MutationEntry, MutationLog, NullSink, TracingSink};
pub use notice::{ChangeNotice, PendingNotices};
