//! The system abstraction.
//!
//! A system is a unit of per-tick logic. The scheduler treats it as
//! opaque: it only ever calls the three lifecycle hooks and compares
//! handles by identity.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use arch_store::World;

/// A unit of per-tick logic driven by a runner.
///
/// `initialize` runs once per system, the first time the owning app
/// starts (or immediately, when registered into an already-running app).
/// `update` runs every tick while the system's runner is active.
/// `dispose` runs exactly once when the app is disposed.
///
/// The `Any` supertrait is what makes the app's typed lookups
/// ([`ArchApp::get_system`](crate::ArchApp::get_system)) possible.
pub trait System: Any {
    /// One-time setup hook. The app guards against double invocation.
    fn initialize(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Per-tick work.
    fn update(&mut self, world: &mut World, dt: f64);

    /// Teardown hook, invoked exactly once by [`ArchApp::dispose`](crate::ArchApp::dispose).
    fn dispose(&mut self) {}
}

/// Shared handle to a system.
///
/// Systems are shared between the app's registration list and their
/// runner's active set. The whole scheduler is single-threaded, so
/// `Rc<RefCell<_>>` is the sharing mechanism throughout.
pub type SystemHandle = Rc<RefCell<dyn System>>;

/// Wrap a system value into a shareable [`SystemHandle`].
pub fn handle<S: System>(system: S) -> SystemHandle {
    Rc::new(RefCell::new(system))
}

/// Identity comparison for system handles.
///
/// Compares the underlying allocation, ignoring how the handle was
/// coerced to `dyn System`.
#[must_use]
pub fn same_system(a: &SystemHandle, b: &SystemHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
