//! Environment Tree
//!
//! Nodes live in an arena owned by [`EnvironmentTree`] and refer to each other
//! by [`NodeId`]. Children lists and queues hold ids; parent and source links
//! are plain ids used for identity only. Ids are never recycled, so an id of
//! a removed node resolves to nothing and queries degrade to empty results.
//!
//! # Example
//!
//! ```
//! use locale_core::{EnvironmentTree, Information, Vector3};
//!
//! let mut tree = EnvironmentTree::new(Information::virtual_info()).unwrap();
//! let root = tree.root();
//! let body = tree
//!     .add_locality(root, Information::physical(Vector3::ZERO, 1.0, 1.0))
//!     .unwrap();
//! assert_eq!(tree.children(root), &[body]);
//! ```

pub mod integration;
pub mod visibility;

pub use visibility::Sighting;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::components::{Information, Locale, Polarity};
use crate::config::PhysicsConfig;
use crate::events::{ChangeNotice, LogSink, PendingNotices, TracingSink};

/// Index of a node in an [`EnvironmentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{:04}", self.0)
    }
}

/// Structural misuse of the tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("{0} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("mass must be positive and finite, got {0}")]
    NonPositiveMass(f64),
}

/// One tree node.
#[derive(Debug)]
pub struct Environment {
    information: Information,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    queue: Vec<NodeId>,
}

impl Environment {
    fn new(information: Information) -> Self {
        Self {
            information,
            parent: None,
            children: Vec::new(),
            queue: Vec::new(),
        }
    }

    pub fn information(&self) -> &Information {
        &self.information
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Pending-update entries.
    pub fn queue(&self) -> &[NodeId] {
        &self.queue
    }
}

/// Arena of environment nodes rooted at one node.
///
/// Slots freed by removal stay empty for the life of the tree. Nodes made
/// with [`create`](Self::create) live until attached and removed, or until
/// [`purge_detached`](Self::purge_detached) drops them. Change notices pile
/// up until [`take_notices`](Self::take_notices) is called.
pub struct EnvironmentTree {
    nodes: Vec<Option<Environment>>,
    root: NodeId,
    physics: PhysicsConfig,
    sink: Box<dyn LogSink>,
    notices: PendingNotices,
}

impl EnvironmentTree {
    /// Creates a tree whose root carries `root` with default physics settings.
    pub fn new(root: Information) -> Result<Self, EnvironmentError> {
        Self::with_config(root, PhysicsConfig::default())
    }

    pub fn with_config(root: Information, physics: PhysicsConfig) -> Result<Self, EnvironmentError> {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            physics,
            sink: Box::new(TracingSink),
            notices: PendingNotices::new(),
        };
        tree.root = tree.create(root)?;
        Ok(tree)
    }

    /// Replaces the structural-mutation log sink.
    pub fn set_log_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = sink;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Number of live nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Environment> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Environment> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn require(&self, id: NodeId) -> Result<&Environment, EnvironmentError> {
        self.node(id).ok_or(EnvironmentError::UnknownNode(id))
    }

    pub fn information(&self, id: NodeId) -> Option<&Information> {
        self.node(id).map(|n| &n.information)
    }

    pub(crate) fn information_mut(&mut self, id: NodeId) -> Option<&mut Information> {
        self.node_mut(id).map(|n| &mut n.information)
    }

    /// Mutable physical state of `id`; `None` for virtual or unknown nodes.
    pub fn locale_mut(&mut self, id: NodeId) -> Option<&mut Locale> {
        self.information_mut(id).and_then(|i| i.locale.as_mut())
    }

    pub fn set_radius(&mut self, id: NodeId, radius: f64) -> Result<(), EnvironmentError> {
        let info = self.information_mut(id).ok_or(EnvironmentError::UnknownNode(id))?;
        info.radius = radius;
        Ok(())
    }

    pub fn set_source(&mut self, id: NodeId, source: NodeId) -> Result<(), EnvironmentError> {
        let info = self.information_mut(id).ok_or(EnvironmentError::UnknownNode(id))?;
        info.set_source(source);
        Ok(())
    }

    /// Replaces the payload of `id` with `information`.
    ///
    /// The node keeps its owner and its polarity storage block; the incoming
    /// channel values are written into that block, so views handed out
    /// earlier keep agreeing with the canonical copy.
    pub fn replace_information(
        &mut self,
        id: NodeId,
        information: Information,
    ) -> Result<(), EnvironmentError> {
        let policy = self.physics.degenerate_policy;
        let info = self.information_mut(id).ok_or(EnvironmentError::UnknownNode(id))?;
        info.adopt(information, policy)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id`, empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Pending-update queue of `id`, empty if the node does not exist.
    pub fn queue(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.queue.as_slice()).unwrap_or(&[])
    }

    /// A view onto the canonical polarity of `id`.
    pub fn polarity_view(&self, id: NodeId) -> Option<Polarity> {
        self.information(id).map(|i| i.polarity().view())
    }

    /// True if `id` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Ids of `id` and everything below it, depth-first, parents first.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_subtree(id, &mut out);
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if !self.contains(id) {
            return;
        }
        out.push(id);
        for child in self.children(id) {
            self.collect_subtree(*child, out);
        }
    }

    /// Drains change notices emitted by integration steps. Callers that run
    /// passes should drain once per pass.
    pub fn take_notices(&mut self) -> Vec<ChangeNotice> {
        self.notices.drain()
    }

    pub(crate) fn push_notice(&mut self, notice: ChangeNotice) {
        self.notices.push(notice);
    }

    fn log(&mut self, message: &str) {
        self.sink.log(message);
    }

    /// Creates a detached node carrying `information`.
    pub fn create(&mut self, mut information: Information) -> Result<NodeId, EnvironmentError> {
        let id = NodeId(self.nodes.len());
        information.bind(id, self.physics.degenerate_policy)?;
        self.nodes.push(Some(Environment::new(information)));
        Ok(id)
    }

    /// Creates a node carrying `information` as the last child of `parent`.
    pub fn add_locality(
        &mut self,
        parent: NodeId,
        information: Information,
    ) -> Result<NodeId, EnvironmentError> {
        self.require(parent)?;
        let id = self.create(information)?;
        self.link(parent, id);
        self.log(&format!("added locality {} under {}", id, parent));
        Ok(id)
    }

    /// Attaches an existing detached node as the last child of `parent`.
    pub fn add_locale_information(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<(), EnvironmentError> {
        self.require(parent)?;
        let node = self.require(child)?;
        if node.parent.is_some() || child == self.root {
            return Err(EnvironmentError::AlreadyAttached(child));
        }
        if parent == child || self.is_descendant(parent, child) {
            return Err(EnvironmentError::Cycle { parent, child });
        }
        self.link(parent, child);
        self.log(&format!("attached {} under {}", child, parent));
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Queues `entry` on `node` so the next [`update`](Self::update) runs a
    /// pass over its children.
    pub fn update_locale_information(
        &mut self,
        node: NodeId,
        entry: NodeId,
    ) -> Result<(), EnvironmentError> {
        self.require(entry)?;
        let target = self.node_mut(node).ok_or(EnvironmentError::UnknownNode(node))?;
        target.queue.push(entry);
        Ok(())
    }

    /// Detaches `child` from `parent` and destroys it with its subtree.
    ///
    /// Every queue entry naming a destroyed node is dropped. Returns false
    /// if `child` is not a child of `parent`.
    pub fn remove_locale_information(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(p) = self.node_mut(parent) else {
            return false;
        };
        let Some(pos) = p.children.iter().position(|c| *c == child) else {
            return false;
        };
        p.children.remove(pos);

        let doomed = self.subtree(child);
        for id in &doomed {
            self.nodes[id.0] = None;
        }
        for node in self.nodes.iter_mut().flatten() {
            node.queue.retain(|q| !doomed.contains(q));
        }
        self.log(&format!(
            "removed {} from {} ({} nodes)",
            child,
            parent,
            doomed.len()
        ));
        true
    }

    /// Destroys every node the root cannot reach, with its subtree, and
    /// drops queue entries naming them. Returns the number destroyed.
    pub fn purge_detached(&mut self) -> usize {
        let reachable: HashSet<NodeId> = self.subtree(self.root).into_iter().collect();
        let doomed: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.contains(*id) && !reachable.contains(id))
            .collect();
        if doomed.is_empty() {
            return 0;
        }
        for id in &doomed {
            self.nodes[id.0] = None;
        }
        for node in self.nodes.iter_mut().flatten() {
            node.queue.retain(|q| !doomed.contains(q));
        }
        self.log(&format!("purged {} detached nodes", doomed.len()));
        doomed.len()
    }

    /// Empties the queue of `node`.
    pub fn clear_queue(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.queue.clear();
        }
    }
}

impl fmt::Debug for EnvironmentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentTree")
            .field("root", &self.root)
            .field("nodes", &self.len())
            .field("physics", &self.physics)
            .finish()
    }
}
