//! Integration
//!
//! Semi-implicit Euler steps driven by pairwise relative polarity. Each
//! step walks a body's exchange ring once:
//!
//! 1. absorption: sum `force_between` over physical siblings
//! 2. vibration: `velocity += force / mass`
//! 3. execution: `position += velocity`
//! 4. mediation: `time += 1`
//! 5. emission: notify every source visible from the body

use locale_numerals::ExchangeState;

use crate::components::Polarity;
use crate::events::ChangeNotice;
use crate::math::Vector3;

use super::{EnvironmentTree, NodeId};

impl EnvironmentTree {
    /// Relative polarity of `a` toward `b`.
    pub fn polarity_between(&self, a: NodeId, b: NodeId) -> Option<Polarity> {
        let here = self.information(a)?;
        let there = self.information(b)?;
        Some(here.polarity_between(there, self.parent(a).is_none()))
    }

    /// Coupling force on `a` from `b`. Zero when either is virtual.
    pub fn force_between(&self, a: NodeId, b: NodeId) -> Option<Vector3> {
        let here = self.information(a)?;
        let there = self.information(b)?;
        Some(here.force_between(there, self.parent(a).is_none()))
    }

    /// Advances one physical body by a full exchange cycle.
    ///
    /// Returns false for virtual or unknown nodes, which are left untouched.
    pub fn step_node(&mut self, id: NodeId) -> bool {
        let Some(force) = self.absorption(id) else {
            return false;
        };
        self.integrate(id, force);
        self.emission(id);
        true
    }

    /// Runs one pass over the children of `node` per queued entry, then
    /// empties the queue. Returns the number of passes.
    ///
    /// Within a pass all forces are taken from the state before the pass,
    /// so mirrored bodies move by mirrored amounts.
    pub fn update(&mut self, node: NodeId) -> usize {
        let passes = self.queue(node).len();
        let children = self.children(node).to_vec();

        for _ in 0..passes {
            let forces: Vec<(NodeId, Vector3)> = children
                .iter()
                .filter_map(|c| self.absorption(*c).map(|f| (*c, f)))
                .collect();
            for (child, force) in &forces {
                self.integrate(*child, *force);
            }
            for (child, _) in &forces {
                self.emission(*child);
            }
        }

        self.clear_queue(node);
        if passes > 0 {
            tracing::debug!(node = %node, passes, children = children.len(), "flushed queue");
        }
        passes
    }

    fn absorption(&mut self, id: NodeId) -> Option<Vector3> {
        let info = self.information(id)?;
        info.position()?;

        let is_root = self.parent(id).is_none();
        let siblings = match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &[],
        };
        let force = siblings
            .iter()
            .filter(|s| **s != id)
            .filter_map(|s| self.information(*s))
            .filter(|other| other.is_physical())
            .fold(Vector3::ZERO, |acc, other| acc + info.force_between(other, is_root));

        self.enter(id, ExchangeState::Absorption);
        Some(force)
    }

    fn integrate(&mut self, id: NodeId, force: Vector3) {
        let policy = self.physics.degenerate_policy;
        let Some(info) = self.information_mut(id) else {
            return;
        };
        let Some(locale) = info.locale.as_mut() else {
            return;
        };

        info.state.advance(); // vibration
        locale.velocity = locale.velocity + force * locale.inverse_mass(policy);
        info.state.advance(); // execution
        locale.position = locale.position + locale.velocity;
        info.state.advance(); // mediation
        locale.time += 1;
    }

    fn emission(&mut self, id: NodeId) {
        self.enter(id, ExchangeState::Emission);
        let Some(locale) = self.information(id).and_then(|i| i.locale.as_ref()) else {
            return;
        };
        let (time, position) = (locale.time, locale.position);
        let observers = self
            .visible_from(id, self.physics.view_radius)
            .into_iter()
            .map(|s| s.source)
            .collect();
        self.push_notice(ChangeNotice {
            changed: id,
            time,
            position,
            observers,
        });
    }

    fn enter(&mut self, id: NodeId, phase: ExchangeState) {
        if let Some(info) = self.information_mut(id) {
            let entered = info.state.advance();
            if entered != phase {
                tracing::trace!(node = %id, %entered, %phase, "exchange ring resynchronised");
                info.state = phase;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Information;
    use locale_numerals::fixtures::preset;
    use locale_numerals::Pentuple;

    fn pair(absorb: Pentuple) -> (EnvironmentTree, NodeId, NodeId) {
        let mut tree = EnvironmentTree::new(Information::virtual_info()).unwrap();
        let root = tree.root();
        let a = tree
            .add_locality(root, Information::physical(Vector3::ZERO, 1.0, 1.0).with_pentuple(absorb))
            .unwrap();
        let b = tree
            .add_locality(
                root,
                Information::physical(Vector3::new(5.0, 0.0, 0.0), 1.0, 1.0).with_pentuple(absorb),
            )
            .unwrap();
        (tree, a, b)
    }

    fn locale(tree: &EnvironmentTree, id: NodeId) -> (Vector3, Vector3, u64) {
        let l = tree.information(id).unwrap().locale.as_ref().unwrap();
        (l.position, l.velocity, l.time)
    }

    #[test]
    fn test_step_node_attracts() {
        let (mut tree, a, b) = pair(preset("attractor"));
        assert!(tree.step_node(a));
        let (pos, vel, time) = locale(&tree, a);
        assert!(vel.x > 0.0);
        assert_eq!(pos, vel);
        assert_eq!(time, 1);
        // b untouched
        assert_eq!(locale(&tree, b).0, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_step_node_repels() {
        let (mut tree, a, _) = pair(preset("repeller"));
        tree.step_node(a);
        assert!(locale(&tree, a).1.x < 0.0);
    }

    #[test]
    fn test_step_node_neutral() {
        let (mut tree, a, _) = pair(preset("neutral"));
        tree.step_node(a);
        assert_eq!(locale(&tree, a).1, Vector3::ZERO);
    }

    #[test]
    fn test_ring_completes_once_per_step() {
        let (mut tree, a, _) = pair(preset("attractor"));
        tree.step_node(a);
        assert_eq!(tree.information(a).unwrap().state, ExchangeState::Emission);
        assert_eq!(locale(&tree, a).2, 1);
    }

    #[test]
    fn test_virtual_nodes_do_not_step() {
        let mut tree = EnvironmentTree::new(Information::virtual_info()).unwrap();
        let root = tree.root();
        assert!(!tree.step_node(root));
        assert!(!tree.step_node(NodeId::new(77)));
        assert_eq!(tree.information(root).unwrap().state, ExchangeState::Emission);
    }

    #[test]
    fn test_update_requires_queue() {
        let (mut tree, a, _) = pair(preset("attractor"));
        let root = tree.root();
        assert_eq!(tree.update(root), 0);
        assert_eq!(locale(&tree, a).2, 0);

        tree.update_locale_information(root, a).unwrap();
        tree.update_locale_information(root, a).unwrap();
        assert_eq!(tree.update(root), 2);
        assert_eq!(locale(&tree, a).2, 2);
        assert!(tree.queue(root).is_empty());
    }

    #[test]
    fn test_emission_notifies_visible_bodies() {
        let (mut tree, a, b) = pair(preset("neutral"));
        tree.step_node(a);
        let notices = tree.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].changed, a);
        assert_eq!(notices[0].observers, vec![b]);
        assert!(tree.take_notices().is_empty());
    }

    #[test]
    fn test_tree_wrappers() {
        let (tree, a, b) = pair(preset("attractor"));
        assert_eq!(tree.polarity_between(a, b).unwrap().absorb(), -1);
        assert_eq!(tree.force_between(a, b), Some(Vector3::new(5.0, 0.0, 0.0)));
        let root = tree.root();
        // the root answers with its own polarity
        let rel = tree.polarity_between(root, a).unwrap();
        assert!(rel.shares_storage_with(&tree.information(root).unwrap().polarity()));
        assert!(tree.force_between(a, NodeId::new(99)).is_none());
    }
}
