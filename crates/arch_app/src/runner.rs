//! Runners — the tick-source abstraction.
//!
//! A runner wires systems into some recurring invocation source. The
//! scheduler only needs `add`/`remove`; what actually drives the ticks
//! is the runner's business. [`TickRunner`] is the bundled
//! implementation: it holds the active system list and executes it when
//! somebody calls [`TickRunner::tick`] — a timer loop, a host engine
//! callback, or a test.

use std::cell::RefCell;
use std::rc::Rc;

use arch_store::World;
use tracing::debug;

use crate::system::{SystemHandle, same_system};

/// Attaches and detaches systems to a recurring tick source.
pub trait Runner {
    /// Wire a system into the tick source. Adding a system twice is a
    /// no-op.
    fn add(&mut self, system: SystemHandle);

    /// Unwire a system. Removing an absent system is a no-op.
    fn remove(&mut self, system: &SystemHandle);
}

/// Shared handle to a runner.
///
/// An `Rc<RefCell<TickRunner>>` coerces to this, so callers can keep
/// the concrete handle for ticking while the app holds the trait
/// object.
pub type RunnerHandle = Rc<RefCell<dyn Runner>>;

/// Identity comparison for runner handles.
#[must_use]
pub fn same_runner(a: &RunnerHandle, b: &RunnerHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A runner driven by explicit [`TickRunner::tick`] calls.
///
/// Systems execute in the order they were added.
#[derive(Default)]
pub struct TickRunner {
    /// Human-readable label, used only for logging.
    name: String,
    systems: Vec<SystemHandle>,
}

impl TickRunner {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            systems: Vec::new(),
        }
    }

    /// Wrap into a shareable handle.
    #[must_use]
    pub fn into_handle(self) -> Rc<RefCell<TickRunner>> {
        Rc::new(RefCell::new(self))
    }

    /// Number of currently active systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Run one tick: invoke every active system's update hook, in add
    /// order, against the given world.
    pub fn tick(&self, world: &mut World, dt: f64) {
        for system in &self.systems {
            system.borrow_mut().update(world, dt);
        }
    }
}

impl Runner for TickRunner {
    fn add(&mut self, system: SystemHandle) {
        if self.systems.iter().any(|s| same_system(s, &system)) {
            return;
        }
        self.systems.push(system);
        debug!(runner = self.name, active = self.systems.len(), "system added");
    }

    fn remove(&mut self, system: &SystemHandle) {
        self.systems.retain(|s| !same_system(s, system));
    }
}

#[cfg(test)]
mod tests {
    use arch_store::{World, WorldId};

    use crate::system::{System, handle};

    use super::*;

    struct Probe {
        ticks: u32,
    }

    impl System for Probe {
        fn update(&mut self, _world: &mut World, _dt: f64) {
            self.ticks += 1;
        }
    }

    #[test]
    fn test_tick_invokes_active_systems() {
        let mut world = World::new(WorldId(1));
        let probe = handle(Probe { ticks: 0 });
        let mut runner = TickRunner::new("update");
        runner.add(probe.clone());

        runner.tick(&mut world, 0.016);
        runner.tick(&mut world, 0.016);

        let guard = probe.borrow();
        let any: &dyn std::any::Any = &*guard;
        assert_eq!(any.downcast_ref::<Probe>().unwrap().ticks, 2);
    }

    #[test]
    fn test_add_is_idempotent() {
        let probe = handle(Probe { ticks: 0 });
        let mut runner = TickRunner::new("update");
        runner.add(probe.clone());
        runner.add(probe);
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn test_remove_unwires_system() {
        let mut world = World::new(WorldId(1));
        let probe = handle(Probe { ticks: 0 });
        let mut runner = TickRunner::new("update");
        runner.add(probe.clone());
        runner.remove(&probe);
        assert!(runner.is_empty());

        runner.tick(&mut world, 0.016);
        let guard = probe.borrow();
        let any: &dyn std::any::Any = &*guard;
        assert_eq!(any.downcast_ref::<Probe>().unwrap().ticks, 0);
    }

    #[test]
    fn test_remove_absent_system_is_noop() {
        let probe = handle(Probe { ticks: 0 });
        let mut runner = TickRunner::new("update");
        runner.remove(&probe);
        assert!(runner.is_empty());
    }
}
