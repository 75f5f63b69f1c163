//! Change Notices
//!
//! Integration steps report which objects saw a body change. Callers poll
//! them with [`EnvironmentTree::take_notices`](crate::EnvironmentTree::take_notices).

use serde::{Deserialize, Serialize};

use crate::environment::NodeId;
use crate::math::Vector3;

/// A body finished an exchange; `observers` are the sources visible from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub changed: NodeId,
    /// The body's step counter after the change.
    pub time: u64,
    pub position: Vector3,
    pub observers: Vec<NodeId>,
}

/// Pending notices queue
#[derive(Debug, Default)]
pub struct PendingNotices {
    notices: Vec<ChangeNotice>,
}

impl PendingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: ChangeNotice) {
        self.notices.push(notice);
    }

    pub fn drain(&mut self) -> Vec<ChangeNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties() {
        let mut pending = PendingNotices::new();
        pending.push(ChangeNotice {
            changed: NodeId::new(1),
            time: 1,
            position: Vector3::ZERO,
            observers: vec![NodeId::new(2)],
        });
        assert_eq!(pending.len(), 1);
        let drained = pending.drain();
        assert_eq!(drained.len(), 1);
        assert!(pending.is_empty());
    }
}
