//! World registry — tracks which worlds currently exist.
//!
//! The registry is an explicit, constructed object rather than ambient
//! global state: whoever needs "enumerate all live worlds" owns (or is
//! handed) a registry. It holds weak references, so dropping every
//! handle to a world removes it from enumeration without an explicit
//! destroy call.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::info;

use crate::world::{World, WorldId};

/// Shared handle to a world.
///
/// The whole inspector core is single-threaded, so worlds are shared via
/// `Rc<RefCell<_>>` — the scheduler, the hierarchy builder, and the
/// registry all hold the same storage.
pub type WorldHandle = Rc<RefCell<World>>;

/// Registry of all live worlds, keyed by [`WorldId`].
#[derive(Debug, Default)]
pub struct WorldRegistry {
    next_id: u64,
    worlds: Vec<(WorldId, Weak<RefCell<World>>)>,
}

impl WorldRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new world, register it, and return its handle.
    pub fn create(&mut self) -> WorldHandle {
        self.next_id += 1;
        let id = WorldId(self.next_id);
        let world = Rc::new(RefCell::new(World::new(id)));
        self.worlds.push((id, Rc::downgrade(&world)));
        info!(world = %id, "world created");
        world
    }

    /// Look up a live world by ID.
    #[must_use]
    pub fn get(&self, id: WorldId) -> Option<WorldHandle> {
        self.worlds.iter().find_map(|(world_id, weak)| {
            if *world_id != id {
                return None;
            }
            let world = weak.upgrade()?;
            let alive = !world.borrow().is_disposed();
            alive.then_some(world)
        })
    }

    /// Enumerate all currently-live worlds, pruning entries whose world
    /// has been dropped or disposed.
    pub fn worlds(&mut self) -> Vec<WorldHandle> {
        self.prune();
        self.worlds
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    }

    /// Dispose a world and remove it from the registry.
    ///
    /// Returns `true` if the world was found.
    pub fn destroy(&mut self, id: WorldId) -> bool {
        let Some(world) = self.get(id) else {
            return false;
        };
        world.borrow_mut().dispose();
        self.prune();
        info!(world = %id, "world destroyed");
        true
    }

    /// Returns the number of live worlds.
    pub fn world_count(&mut self) -> usize {
        self.prune();
        self.worlds.len()
    }

    fn prune(&mut self) {
        self.worlds.retain(|(_, weak)| {
            weak.upgrade()
                .is_some_and(|world| !world.borrow().is_disposed())
        });
    }
}
