//! Information
//!
//! The state payload carried by every environment node. Physical payloads
//! carry a [`Locale`] (time, position, velocity, rotation, mass); virtual
//! payloads carry none and take no part in spatial tests.

use serde::Serialize;

use locale_numerals::{ExchangeState, Pentuple};

use crate::components::polarity::Polarity;
use crate::config::DegeneratePolicy;
use crate::environment::{EnvironmentError, NodeId};
use crate::math::Vector3;

/// Physical state of a body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Locale {
    /// Integration steps taken.
    pub time: u64,
    pub position: Vector3,
    pub velocity: Vector3,
    pub rotation: Vector3,
    pub mass: f64,
}

impl Locale {
    pub fn new(position: Vector3, mass: f64) -> Self {
        Self {
            time: 0,
            position,
            velocity: Vector3::ZERO,
            rotation: Vector3::ZERO,
            mass,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3) -> Self {
        self.rotation = rotation;
        self
    }

    /// `1 / mass`; with [`DegeneratePolicy::Guard`] a non-positive mass
    /// yields 0 instead of an infinite or negative factor.
    pub fn inverse_mass(&self, policy: DegeneratePolicy) -> f64 {
        match policy {
            DegeneratePolicy::Guard if !(self.mass > 0.0) => 0.0,
            _ => 1.0 / self.mass,
        }
    }
}

/// State payload of one environment node.
#[derive(Debug)]
pub struct Information {
    owner: Option<NodeId>,
    source: Option<NodeId>,
    /// Bounding-sphere radius.
    pub radius: f64,
    polarity: Polarity,
    pub state: ExchangeState,
    pub locale: Option<Locale>,
}

impl Information {
    /// A virtual payload: no position, always visible.
    pub fn virtual_info() -> Self {
        Self {
            owner: None,
            source: None,
            radius: 0.0,
            polarity: Polarity::new(),
            state: ExchangeState::default(),
            locale: None,
        }
    }

    /// A physical payload at `position`.
    pub fn physical(position: Vector3, radius: f64, mass: f64) -> Self {
        Self {
            radius,
            locale: Some(Locale::new(position, mass)),
            ..Self::virtual_info()
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_source(mut self, source: NodeId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_pentuple(self, pentuple: Pentuple) -> Self {
        self.polarity.set_pentuple(pentuple);
        self
    }

    /// The canonical polarity. Its storage block stays fixed for the life
    /// of the payload; writes go through [`set_polarity`](Self::set_polarity)
    /// or the channel setters.
    pub fn polarity(&self) -> &Polarity {
        &self.polarity
    }

    /// Overwrites every channel in place, so existing views observe it.
    pub fn set_polarity(&self, pentuple: Pentuple) {
        self.polarity.set_pentuple(pentuple);
    }

    /// The node whose state this is; `None` until inserted into a tree.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Aggregation key. Defaults to the owner when no source was given.
    pub fn source(&self) -> Option<NodeId> {
        self.source.or(self.owner)
    }

    pub fn set_source(&mut self, source: NodeId) {
        self.source = Some(source);
    }

    pub fn is_physical(&self) -> bool {
        self.locale.is_some()
    }

    pub fn position(&self) -> Option<Vector3> {
        self.locale.as_ref().map(|l| l.position)
    }

    /// Binds this payload to `owner`, moving the polarity into a canonical
    /// block for that node.
    pub(crate) fn bind(
        &mut self,
        owner: NodeId,
        policy: DegeneratePolicy,
    ) -> Result<(), EnvironmentError> {
        check_mass(self.locale.as_ref(), policy)?;
        self.owner = Some(owner);
        self.polarity = Polarity::owned(owner, self.polarity.pentuple());
        Ok(())
    }

    /// Takes over the contents of `incoming` while keeping this payload's
    /// owner and polarity block. Channel values are copied into the block.
    pub(crate) fn adopt(
        &mut self,
        incoming: Information,
        policy: DegeneratePolicy,
    ) -> Result<(), EnvironmentError> {
        check_mass(incoming.locale.as_ref(), policy)?;
        self.source = incoming.source;
        self.radius = incoming.radius;
        self.state = incoming.state;
        self.locale = incoming.locale;
        self.polarity.set_pentuple(incoming.polarity.pentuple());
        Ok(())
    }

    /// Relative polarity toward `other`.
    ///
    /// A root payload has no relative state and answers with a view of its
    /// own polarity. Otherwise the delta is applied twice:
    /// `compare(p, compare(p, q))`.
    pub fn polarity_between(&self, other: &Information, is_root: bool) -> Polarity {
        if is_root {
            return self.polarity.view();
        }
        self.polarity.compare(&self.polarity.compare(&other.polarity))
    }

    /// Coupling force toward `other`: the separation scaled by the relative
    /// absorb channel. -1 attracts, 0 is inert, 1 repels. Zero when either
    /// side is virtual.
    pub fn force_between(&self, other: &Information, is_root: bool) -> Vector3 {
        match (self.position(), other.position()) {
            (Some(here), Some(there)) => {
                let absorb = self.polarity_between(other, is_root).absorb();
                (here - there) * f64::from(absorb)
            }
            _ => Vector3::ZERO,
        }
    }
}

fn check_mass(locale: Option<&Locale>, policy: DegeneratePolicy) -> Result<(), EnvironmentError> {
    match (policy, locale) {
        (DegeneratePolicy::Guard, Some(l)) if !(l.mass > 0.0) || !l.mass.is_finite() => {
            Err(EnvironmentError::NonPositiveMass(l.mass))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locale_numerals::fixtures::preset;

    fn body(x: f64, pentuple: Pentuple) -> Information {
        Information::physical(Vector3::new(x, 0.0, 0.0), 1.0, 1.0).with_pentuple(pentuple)
    }

    #[test]
    fn test_root_answers_own_polarity() {
        let a = body(0.0, preset("attractor"));
        let b = body(5.0, preset("repeller"));
        let rel = a.polarity_between(&b, true);
        assert!(rel.shares_storage_with(&a.polarity));
        assert_eq!(rel.absorb(), -1);
    }

    #[test]
    fn test_double_compare() {
        let a = body(0.0, Pentuple::new([-1, 0, 1, 0, -1]).unwrap());
        let b = body(5.0, Pentuple::new([-1, 1, 1, -1, 0]).unwrap());
        let rel = a.polarity_between(&b, false);
        assert_eq!(rel.pentuple().digits(), [-1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_force_sign_follows_absorb() {
        let a = body(0.0, preset("attractor"));
        let b = body(5.0, preset("attractor"));
        // attraction: force on a points toward b
        assert_eq!(a.force_between(&b, false), Vector3::new(5.0, 0.0, 0.0));

        let c = body(0.0, preset("repeller"));
        let d = body(5.0, preset("repeller"));
        assert_eq!(c.force_between(&d, false), Vector3::new(-5.0, 0.0, 0.0));

        let e = body(0.0, preset("neutral"));
        let f = body(5.0, preset("neutral"));
        assert_eq!(e.force_between(&f, false), Vector3::ZERO);

        // disagreement marks the channel as changed, which repels
        assert_eq!(a.force_between(&e, false), Vector3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_virtual_has_no_force() {
        let a = body(0.0, preset("attractor"));
        let v = Information::virtual_info().with_pentuple(preset("attractor"));
        assert_eq!(a.force_between(&v, false), Vector3::ZERO);
        assert!(!v.is_physical());
        assert_eq!(v.position(), None);
    }

    #[test]
    fn test_bind_rejects_bad_mass_when_guarded() {
        let mut info = Information::physical(Vector3::ZERO, 1.0, 0.0);
        assert!(matches!(
            info.bind(NodeId::new(0), DegeneratePolicy::Guard),
            Err(EnvironmentError::NonPositiveMass(_))
        ));
        let mut info = Information::physical(Vector3::ZERO, 1.0, 0.0);
        assert!(info.bind(NodeId::new(0), DegeneratePolicy::Propagate).is_ok());
        assert_eq!(info.locale.as_ref().unwrap().inverse_mass(DegeneratePolicy::Propagate), f64::INFINITY);
        assert_eq!(info.locale.as_ref().unwrap().inverse_mass(DegeneratePolicy::Guard), 0.0);
    }

    #[test]
    fn test_adopt_keeps_block() {
        let mut info = body(0.0, preset("attractor"));
        info.bind(NodeId::new(3), DegeneratePolicy::Guard).unwrap();
        let view = info.polarity().view();

        info.adopt(
            Information::virtual_info().with_pentuple(preset("saturated")),
            DegeneratePolicy::Guard,
        )
        .unwrap();
        assert!(!info.is_physical());
        assert_eq!(info.owner(), Some(NodeId::new(3)));
        assert_eq!(view.pentuple(), preset("saturated"));
        assert!(view.shares_storage_with(info.polarity()));

        let bad = info.adopt(Information::physical(Vector3::ZERO, 1.0, -2.0), DegeneratePolicy::Guard);
        assert_eq!(bad, Err(EnvironmentError::NonPositiveMass(-2.0)));
        assert!(!info.is_physical());
    }

    #[test]
    fn test_source_defaults_to_owner() {
        let mut info = Information::virtual_info();
        assert_eq!(info.source(), None);
        info.bind(NodeId::new(7), DegeneratePolicy::Guard).unwrap();
        assert_eq!(info.source(), Some(NodeId::new(7)));
        assert_eq!(info.polarity().owner(), Some(NodeId::new(7)));
        info.set_source(NodeId::new(2));
        assert_eq!(info.source(), Some(NodeId::new(2)));
    }
}
