//! Visibility and Aggregation
//!
//! Occlusion-aware queries over a node's children, grouped by source.
//!
//! A child is a candidate when it is virtual (always visible) or its centre
//! lies within the query radius. A physical candidate is hidden when the
//! bounding sphere of any *other* physical candidate overlaps the line of
//! sight from the query point to its centre. The test is binary: a blocker
//! whose centre lies beyond the candidate still hides it if its sphere
//! reaches back across the sight line.
//!
//! Entries whose source node has been removed are dropped from every
//! result. Such an entry still stands in space, so it can hide others.
//!
//! Occlusion always uses the guarded direction: a candidate at the query
//! point has a zero sight line and is never hidden, whatever the
//! [`DegeneratePolicy`](crate::config::DegeneratePolicy).

use serde::Serialize;
use std::collections::HashMap;

use crate::components::{Information, PolarityTotals};
use crate::math::{Ray, Vector3};

use super::{EnvironmentTree, NodeId};

/// One aggregated entry of a query result.
///
/// Position and radius come from the first contributing child in child
/// order; polarity channels are summed over every contributor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sighting {
    pub source: NodeId,
    pub position: Option<Vector3>,
    pub radius: f64,
    pub polarity: PolarityTotals,
    pub contributors: usize,
}

impl EnvironmentTree {
    /// Visible children of `node` from `position` within `radius`, one entry
    /// per distinct source.
    pub fn locale_information(&self, node: NodeId, position: Vector3, radius: f64) -> Vec<Sighting> {
        self.query(node, position, radius, None)
    }

    /// What the physical node `viewer` sees among its parent's children.
    ///
    /// The viewer itself is left out. Empty when the viewer is virtual, has
    /// no parent, or does not exist.
    pub fn visible_from(&self, viewer: NodeId, radius: f64) -> Vec<Sighting> {
        let Some(position) = self.information(viewer).and_then(Information::position) else {
            return Vec::new();
        };
        let Some(parent) = self.parent(viewer) else {
            return Vec::new();
        };
        self.query(parent, position, radius, Some(viewer))
    }

    /// Sums over children whose source is virtual, one entry per source.
    ///
    /// Children whose source no longer exists are skipped.
    pub fn global_information(&self, node: NodeId) -> Vec<Sighting> {
        let entries = self.children(node).iter().filter_map(|id| {
            // a removed source resolves to nothing and drops the entry
            let info = self.information(*id)?;
            let source = self.information(info.source()?)?;
            (!source.is_physical()).then_some(info)
        });
        aggregate(entries)
    }

    fn query(
        &self,
        node: NodeId,
        position: Vector3,
        radius: f64,
        exclude: Option<NodeId>,
    ) -> Vec<Sighting> {
        let candidates: Vec<(NodeId, &Information)> = self
            .children(node)
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| self.information(*id).map(|info| (*id, info)))
            .filter(|(_, info)| match info.position() {
                Some(p) => (p - position).length() <= radius,
                None => true,
            })
            .collect();

        let visible = candidates
            .iter()
            .filter(|(_, info)| self.has_live_source(info))
            .filter(|(id, info)| !self.is_occluded(position, *id, info, &candidates))
            .map(|(_, info)| *info);
        let sightings = aggregate(visible);

        tracing::debug!(
            node = %node,
            candidates = candidates.len(),
            sightings = sightings.len(),
            "visibility query"
        );
        sightings
    }

    fn has_live_source(&self, info: &Information) -> bool {
        info.source().is_some_and(|s| self.contains(s))
    }

    fn is_occluded(
        &self,
        origin: Vector3,
        id: NodeId,
        info: &Information,
        candidates: &[(NodeId, &Information)],
    ) -> bool {
        let Some(target) = info.position() else {
            return false;
        };
        let offset = target - origin;
        let distance = offset.length();
        let sight = Ray::new(origin, offset.normalized());

        candidates
            .iter()
            .filter(|(other, _)| *other != id)
            .filter_map(|(_, o)| o.position().map(|p| (p, o.radius)))
            .any(|(center, r)| sight.relative_to(center).sphere_blocks_segment(r, distance))
    }
}

/// Groups entries by source in order of first appearance and sums their
/// polarity channels.
fn aggregate<'a>(entries: impl Iterator<Item = &'a Information>) -> Vec<Sighting> {
    let mut out: Vec<Sighting> = Vec::new();
    let mut index: HashMap<NodeId, usize> = HashMap::new();

    for info in entries {
        let Some(source) = info.source() else {
            continue;
        };
        let totals = info.polarity().totals();
        match index.get(&source) {
            Some(&i) => {
                out[i].polarity += totals;
                out[i].contributors += 1;
            }
            None => {
                index.insert(source, out.len());
                out.push(Sighting {
                    source,
                    position: info.position(),
                    radius: info.radius,
                    polarity: totals,
                    contributors: 1,
                });
            }
        }
    }
    out
}
