//! Scenario Setup
//!
//! Builds trees through the public mutators only. Random scenarios draw from
//! a seeded `SmallRng`, so the same seed always produces the same tree.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use locale_numerals::{Channel, Pentuple};

use crate::components::Information;
use crate::config::EngineConfig;
use crate::environment::{EnvironmentError, EnvironmentTree, NodeId};
use crate::math::Vector3;

/// Summary of what a scenario builder created.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSummary {
    pub bodies: Vec<NodeId>,
    pub fields: Vec<NodeId>,
}

/// Two unit-mass bodies on the x axis, `distance` apart, sharing `pentuple`.
pub fn two_body(
    distance: f64,
    pentuple: Pentuple,
) -> Result<(EnvironmentTree, NodeId, NodeId), EnvironmentError> {
    let mut tree = EnvironmentTree::new(Information::virtual_info())?;
    let root = tree.root();
    let a = tree.add_locality(
        root,
        Information::physical(Vector3::ZERO, 1.0, 1.0).with_pentuple(pentuple),
    )?;
    let b = tree.add_locality(
        root,
        Information::physical(Vector3::new(distance, 0.0, 0.0), 1.0, 1.0).with_pentuple(pentuple),
    )?;
    Ok((tree, a, b))
}

fn random_pentuple(rng: &mut SmallRng) -> Pentuple {
    Channel::ALL
        .iter()
        .fold(Pentuple::zero(), |p, channel| {
            p.with_clamped(*channel, f64::from(rng.gen_range(-1i8..=1)))
        })
}

/// Scatters bodies and virtual fields under a fresh virtual root.
pub fn build_scenario(
    config: &EngineConfig,
) -> Result<(EnvironmentTree, ScenarioSummary), EnvironmentError> {
    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
    let mut tree = EnvironmentTree::with_config(Information::virtual_info(), config.physics.clone())?;
    let root = tree.root();
    let mut summary = ScenarioSummary::default();
    let spread = config.simulation.spread.abs();

    for _ in 0..config.simulation.bodies {
        let position = if spread > 0.0 {
            Vector3::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
            )
        } else {
            Vector3::ZERO
        };
        let info = Information::physical(
            position,
            config.physics.default_radius,
            config.physics.default_mass,
        )
        .with_pentuple(random_pentuple(&mut rng));
        summary.bodies.push(tree.add_locality(root, info)?);
    }

    for _ in 0..config.simulation.fields {
        let info = Information::virtual_info().with_pentuple(random_pentuple(&mut rng));
        summary.fields.push(tree.add_locality(root, info)?);
    }

    tracing::debug!(
        seed = config.simulation.seed,
        bodies = summary.bodies.len(),
        fields = summary.fields.len(),
        "built scenario"
    );
    Ok((tree, summary))
}
