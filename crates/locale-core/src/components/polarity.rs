//! Polarity
//!
//! Five ternary channels backed by one [`Pentuple`]. A node's canonical
//! polarity owns a shared storage block; every view handed out for that node
//! reads and writes the same block, so there is one source of truth per owner.

use serde::{Deserialize, Serialize, Serializer};
use std::cell::Cell;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::rc::Rc;

use locale_numerals::{Channel, HexagramReading, NumeralError, Pentuple};

use crate::environment::NodeId;

/// Five-channel ternary state with shared storage.
///
/// Setters take `&self`: the storage block is shared between views and
/// mutated through a [`Cell`]. Not `Send`; the engine is single-threaded.
pub struct Polarity {
    owner: Option<NodeId>,
    block: Rc<Cell<Pentuple>>,
}

impl Polarity {
    /// An unowned polarity with all channels at 0.
    pub fn new() -> Self {
        Self::from_pentuple(Pentuple::zero())
    }

    /// An unowned polarity holding `pentuple`.
    pub fn from_pentuple(pentuple: Pentuple) -> Self {
        Self {
            owner: None,
            block: Rc::new(Cell::new(pentuple)),
        }
    }

    /// A fresh canonical block for `owner`.
    pub(crate) fn owned(owner: NodeId, pentuple: Pentuple) -> Self {
        Self {
            owner: Some(owner),
            block: Rc::new(Cell::new(pentuple)),
        }
    }

    /// The node this polarity speaks for, if any.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Another handle onto the same storage block.
    pub fn view(&self) -> Polarity {
        Polarity {
            owner: self.owner,
            block: Rc::clone(&self.block),
        }
    }

    /// An unowned copy of the current values with its own storage.
    pub fn detached(&self) -> Polarity {
        Polarity::from_pentuple(self.pentuple())
    }

    /// True if both handles resolve to the same storage block.
    pub fn shares_storage_with(&self, other: &Polarity) -> bool {
        Rc::ptr_eq(&self.block, &other.block)
    }

    pub fn pentuple(&self) -> Pentuple {
        self.block.get()
    }

    pub fn set_pentuple(&self, pentuple: Pentuple) {
        self.block.set(pentuple);
    }

    pub fn get(&self, channel: Channel) -> i8 {
        self.pentuple().digit(channel)
    }

    /// Writes `value` to `channel`, snapped to -1, 0 or 1.
    pub fn set(&self, channel: Channel, value: f64) {
        self.block.set(self.pentuple().with_clamped(channel, value));
    }

    pub fn absorb(&self) -> i8 {
        self.get(Channel::Absorb)
    }

    pub fn listen(&self) -> i8 {
        self.get(Channel::Listen)
    }

    pub fn execute(&self) -> i8 {
        self.get(Channel::Execute)
    }

    pub fn mediate(&self) -> i8 {
        self.get(Channel::Mediate)
    }

    pub fn emit(&self) -> i8 {
        self.get(Channel::Emit)
    }

    pub fn set_absorb(&self, value: f64) {
        self.set(Channel::Absorb, value);
    }

    pub fn set_listen(&self, value: f64) {
        self.set(Channel::Listen, value);
    }

    pub fn set_execute(&self, value: f64) {
        self.set(Channel::Execute, value);
    }

    pub fn set_mediate(&self, value: f64) {
        self.set(Channel::Mediate, value);
    }

    pub fn set_emit(&self, value: f64) {
        self.set(Channel::Emit, value);
    }

    /// Channel-wise delta: agreeing channels are kept, the rest become 1.
    /// The result is unowned.
    pub fn compare(&self, other: &Polarity) -> Polarity {
        Polarity::from_pentuple(self.pentuple().compare(&other.pentuple()))
    }

    /// Packed trit number, negated when the absorb channel is -1.
    ///
    /// Only absorb carries the sign of the packed integer.
    pub fn as_pentuple(&self) -> i16 {
        let n = i16::from(self.pentuple().number());
        if self.absorb() == -1 {
            -n
        } else {
            n
        }
    }

    /// Inverse of [`as_pentuple`](Self::as_pentuple). The magnitude is
    /// decoded as a trit number; a negative value forces absorb to -1.
    pub fn set_as_pentuple(&self, value: i16) -> Result<(), NumeralError> {
        let mut pentuple = Pentuple::decompose(value.unsigned_abs())?;
        if value < 0 {
            pentuple = pentuple.with_digit(Channel::Absorb, -1)?;
        }
        self.block.set(pentuple);
        Ok(())
    }

    /// Bit projection (channel == 1 sets its bit) with the sign marker tied
    /// to the absorb channel.
    pub fn as_hexagram(&self) -> HexagramReading {
        let mut reading = self.pentuple().hexagram_number();
        reading.negative = self.absorb() == -1;
        reading
    }

    /// Inverse of [`as_hexagram`](Self::as_hexagram). Set bits become 1,
    /// clear bits 0, and the sign marker makes absorb -1.
    pub fn set_as_hexagram(&self, reading: HexagramReading) {
        self.block.set(reading.to_pentuple());
    }

    pub fn totals(&self) -> PolarityTotals {
        PolarityTotals::from_pentuple(self.pentuple())
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polarity")
            .field("owner", &self.owner)
            .field("pentuple", &self.pentuple())
            .finish()
    }
}

impl Serialize for Polarity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.totals().serialize(serializer)
    }
}

/// Unclamped per-channel sums used when several entries aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolarityTotals {
    pub absorb: i32,
    pub listen: i32,
    pub execute: i32,
    pub mediate: i32,
    pub emit: i32,
}

impl PolarityTotals {
    pub fn from_pentuple(pentuple: Pentuple) -> Self {
        let d = pentuple.digits();
        Self {
            absorb: i32::from(d[0]),
            listen: i32::from(d[1]),
            execute: i32::from(d[2]),
            mediate: i32::from(d[3]),
            emit: i32::from(d[4]),
        }
    }

    pub fn get(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Absorb => self.absorb,
            Channel::Listen => self.listen,
            Channel::Execute => self.execute,
            Channel::Mediate => self.mediate,
            Channel::Emit => self.emit,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == PolarityTotals::default()
    }
}

impl Add for PolarityTotals {
    type Output = PolarityTotals;

    fn add(self, rhs: PolarityTotals) -> PolarityTotals {
        PolarityTotals {
            absorb: self.absorb + rhs.absorb,
            listen: self.listen + rhs.listen,
            execute: self.execute + rhs.execute,
            mediate: self.mediate + rhs.mediate,
            emit: self.emit + rhs.emit,
        }
    }
}

impl AddAssign for PolarityTotals {
    fn add_assign(&mut self, rhs: PolarityTotals) {
        *self = *self + rhs;
    }
}
