//! Entity references.
//!
//! An [`EntityRef`] is a lightweight handle into a [`World`](crate::World):
//! a slot index paired with the slot's version at the time the entity was
//! spawned. When a slot is despawned and later reused, its version is
//! bumped, so references held from before the reuse compare stale instead
//! of silently pointing at the new occupant.

use serde::{Deserialize, Serialize};

/// A reference to an entity slot in a world.
///
/// Entity references carry no data of their own and are only meaningful
/// against the world that produced them. Liveness must be checked through
/// [`World::is_alive`](crate::World::is_alive) — a reference can go stale
/// at any time if the world is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    /// Slot index within the world.
    pub index: u32,
    /// Slot version at spawn time. Mismatch against the slot's current
    /// version means the entity has been despawned (and possibly replaced).
    pub version: u32,
}

impl EntityRef {
    /// Create an entity reference from raw parts.
    #[must_use]
    pub const fn new(index: u32, version: u32) -> Self {
        Self { index, version }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}:{})", self.index, self.version)
    }
}
