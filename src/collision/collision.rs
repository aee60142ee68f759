use super::manifold::Manifold2;
use crate::world::ColliderHandle;

/// Order-independent identity of a collider pair, packed from the two
/// collider ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(u64);

impl PairId {
    pub fn new(id_a: u32, id_b: u32) -> Self {
        let (lo, hi) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };
        PairId(((lo as u64) << 32) | hi as u64)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A detected overlap between two colliders during one simulation step.
///
/// `manifold` is present for solid contacts and absent for trigger overlaps.
/// Its normal points from `them` toward `me`.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision2D {
    pub me: ColliderHandle,
    pub them: ColliderHandle,
    pub manifold: Option<Manifold2>,
    /// Step index at which this record was last observed.
    pub frame: u64,
    pub pair_id: PairId,
}

impl Collision2D {
    pub fn new(
        me: ColliderHandle,
        me_id: u32,
        them: ColliderHandle,
        them_id: u32,
        manifold: Option<Manifold2>,
        frame: u64,
    ) -> Self {
        Self {
            me,
            them,
            manifold,
            frame,
            pair_id: PairId::new(me_id, them_id),
        }
    }

    /// The same collision seen from `them`.
    pub fn swapped(&self) -> Self {
        Self {
            me: self.them,
            them: self.me,
            manifold: self.manifold.map(|m| m.flipped()),
            frame: self.frame,
            pair_id: self.pair_id,
        }
    }

    pub fn involves(&self, collider: ColliderHandle) -> bool {
        self.me == collider || self.them == collider
    }
}
