//! The application root.
//!
//! [`ArchApp`] owns a world, a set of registered systems partitioned
//! into runner groups, and the running/disposed lifecycle state. Groups
//! preserve runner-registration order; systems within a group preserve
//! insertion order. Every lifecycle transition walks systems in that
//! same group-then-insertion order.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use arch_store::{WorldHandle, WorldRegistry};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::runner::{RunnerHandle, TickRunner, same_runner};
use crate::system::{System, SystemHandle, same_system};

/// Invalid lifecycle transitions. These are caller errors: the app's
/// state is untouched when one is returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("app is already running")]
    AlreadyRunning,
    #[error("app is not running")]
    NotRunning,
    #[error("app is disposed")]
    Disposed,
}

/// One registered system and its one-shot initialization guard.
struct SystemRecord {
    system: SystemHandle,
    initialized: bool,
}

/// All systems sharing one runner, in insertion order.
struct RunnerGroup {
    runner: RunnerHandle,
    records: Vec<SystemRecord>,
}

/// The composition root: owns the world, groups systems by runner, and
/// drives their lifecycle.
///
/// States: created → running → stopped, with stop/run freely
/// alternating, plus a terminal disposed state reachable from any of
/// them. All operations are synchronous and single-threaded.
pub struct ArchApp {
    world: WorldHandle,
    /// Whether `dispose` should also dispose the world. True for worlds
    /// the app created, false for caller-supplied ones.
    owns_world: bool,
    default_runner: Rc<RefCell<TickRunner>>,
    groups: Vec<RunnerGroup>,
    running: bool,
    disposed: bool,
}

impl ArchApp {
    /// Create an app with a fresh world from the registry. The app
    /// claims disposal ownership of that world.
    #[must_use]
    pub fn new(registry: &mut WorldRegistry) -> Self {
        Self::build(registry.create(), true)
    }

    /// Create an app around a caller-supplied world. The caller keeps
    /// disposal ownership; [`ArchApp::dispose`] leaves the world alive.
    #[must_use]
    pub fn with_world(world: WorldHandle) -> Self {
        Self::build(world, false)
    }

    fn build(world: WorldHandle, owns_world: bool) -> Self {
        Self {
            world,
            owns_world,
            default_runner: TickRunner::new("default").into_handle(),
            groups: Vec::new(),
            running: false,
            disposed: false,
        }
    }

    /// The world this app drives.
    #[must_use]
    pub fn world(&self) -> WorldHandle {
        self.world.clone()
    }

    /// The fallback runner used by [`ArchApp::register`]. Returned
    /// concretely so the caller can drive its ticks.
    #[must_use]
    pub fn default_runner(&self) -> Rc<RefCell<TickRunner>> {
        self.default_runner.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    // -- Registration --

    /// Register a system on the default runner.
    ///
    /// Convenience over [`ArchApp::register_handle`] for systems the
    /// caller does not need to keep a handle to.
    pub fn register<S: System>(&mut self, system: S) {
        self.register_handle(crate::system::handle(system));
    }

    /// Register a system handle on the default runner.
    pub fn register_handle(&mut self, system: SystemHandle) {
        let runner: RunnerHandle = self.default_runner.clone();
        self.register_on(system, runner);
    }

    /// Register a system handle on a specific runner.
    ///
    /// Registration has set semantics on handle identity: registering
    /// the same instance again is a no-op, whichever runner is named.
    /// When the app is already running, the system is initialized and
    /// wired into its runner immediately — late registration behaves
    /// like registration-before-run, just deferred.
    pub fn register_on(&mut self, system: SystemHandle, runner: RunnerHandle) {
        if self.disposed {
            warn!("register on a disposed app ignored");
            return;
        }
        if self.is_registered(&system) {
            debug!("system already registered, ignoring");
            return;
        }

        let mut record = SystemRecord {
            system,
            initialized: false,
        };

        if self.running {
            Self::start_record(&self.world, &runner, &mut record);
        }

        match self
            .groups
            .iter_mut()
            .find(|group| same_runner(&group.runner, &runner))
        {
            Some(group) => group.records.push(record),
            None => self.groups.push(RunnerGroup {
                runner,
                records: vec![record],
            }),
        }
    }

    fn is_registered(&self, system: &SystemHandle) -> bool {
        self.groups
            .iter()
            .flat_map(|group| &group.records)
            .any(|record| same_system(&record.system, system))
    }

    /// Initialize a record (once) and add its system to the runner.
    fn start_record(world: &WorldHandle, runner: &RunnerHandle, record: &mut SystemRecord) {
        if !record.initialized {
            record.system.borrow_mut().initialize(&mut world.borrow_mut());
            record.initialized = true;
        }
        runner.borrow_mut().add(record.system.clone());
    }

    // -- Lifecycle --

    /// Start the app: initialize every system (one-shot, guarded) and
    /// add it to its runner, group by group in registration order.
    ///
    /// # Errors
    ///
    /// [`AppError::AlreadyRunning`] if called while running,
    /// [`AppError::Disposed`] after disposal; no system's runner
    /// membership changes in either case.
    pub fn run(&mut self) -> Result<(), AppError> {
        if self.disposed {
            return Err(AppError::Disposed);
        }
        if self.running {
            return Err(AppError::AlreadyRunning);
        }
        for group in &mut self.groups {
            for record in &mut group.records {
                Self::start_record(&self.world, &group.runner, record);
            }
        }
        self.running = true;
        info!(
            systems = self.system_count(),
            runners = self.groups.len(),
            "app running"
        );
        Ok(())
    }

    /// Stop the app: remove every system from its runner, in the same
    /// order `run` added them. Registrations and initialization state
    /// survive, so a later `run` resumes the same systems.
    ///
    /// # Errors
    ///
    /// [`AppError::NotRunning`] if the app is not running,
    /// [`AppError::Disposed`] after disposal.
    pub fn stop(&mut self) -> Result<(), AppError> {
        if self.disposed {
            return Err(AppError::Disposed);
        }
        if !self.running {
            return Err(AppError::NotRunning);
        }
        for group in &self.groups {
            for record in &group.records {
                group.runner.borrow_mut().remove(&record.system);
            }
        }
        self.running = false;
        info!("app stopped");
        Ok(())
    }

    /// Dispose the app: stop if running, invoke every system's dispose
    /// hook, and dispose the world when the app owns it.
    ///
    /// Idempotent — later calls are no-ops, and no system or world is
    /// disposed twice.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if self.running {
            // Cannot fail: the running check above mirrors stop's guard.
            let _ = self.stop();
        }
        for group in &self.groups {
            for record in &group.records {
                record.system.borrow_mut().dispose();
            }
        }
        if self.owns_world {
            self.world.borrow_mut().dispose();
        }
        self.disposed = true;
        info!("app disposed");
    }

    // -- Queries --

    /// First registered system of concrete type `T`, in group-then-
    /// insertion order.
    #[must_use]
    pub fn get_system<T: System>(&self) -> Option<SystemHandle> {
        self.iter_systems().find(|system| is_type::<T>(system))
    }

    /// All registered systems of concrete type `T`.
    #[must_use]
    pub fn get_systems<T: System>(&self) -> Vec<SystemHandle> {
        self.iter_systems()
            .filter(|system| is_type::<T>(system))
            .collect()
    }

    /// Every registered system, in group-then-insertion order.
    #[must_use]
    pub fn all_systems(&self) -> Vec<SystemHandle> {
        self.iter_systems().collect()
    }

    fn iter_systems(&self) -> impl Iterator<Item = SystemHandle> + '_ {
        self.groups
            .iter()
            .flat_map(|group| &group.records)
            .map(|record| record.system.clone())
    }

    fn system_count(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }
}

fn is_type<T: System>(system: &SystemHandle) -> bool {
    let guard = system.borrow();
    let any: &dyn Any = &*guard;
    any.is::<T>()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use arch_store::World;

    use crate::system::handle;

    use super::*;

    /// Records lifecycle calls into a shared log, tagged with its name.
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> SystemHandle {
            handle(Self {
                name,
                log: log.clone(),
            })
        }
    }

    impl System for Probe {
        fn initialize(&mut self, _world: &mut World) {
            self.log.borrow_mut().push(format!("init {}", self.name));
        }

        fn update(&mut self, _world: &mut World, _dt: f64) {
            self.log.borrow_mut().push(format!("update {}", self.name));
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().push(format!("dispose {}", self.name));
        }
    }

    struct Other;

    impl System for Other {
        fn update(&mut self, _world: &mut World, _dt: f64) {}
    }

    fn app() -> ArchApp {
        let mut registry = WorldRegistry::new();
        ArchApp::new(&mut registry)
    }

    #[test]
    fn test_register_is_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        let probe = Probe::new("a", &log);
        app.register_handle(probe.clone());
        app.register_handle(probe);
        assert_eq!(app.all_systems().len(), 1);
    }

    #[test]
    fn test_run_initializes_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.register_handle(Probe::new("b", &log));
        app.run().unwrap();
        assert_eq!(*log.borrow(), vec!["init a", "init b"]);
        assert!(app.is_running());
    }

    #[test]
    fn test_runner_groups_preserve_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        let fixed = TickRunner::new("fixed").into_handle();

        // A and B on the default runner, C on "fixed".
        app.register_handle(Probe::new("a", &log));
        app.register_handle(Probe::new("b", &log));
        let fixed_handle: RunnerHandle = fixed.clone();
        app.register_on(Probe::new("c", &log), fixed_handle);
        app.run().unwrap();

        assert_eq!(*log.borrow(), vec!["init a", "init b", "init c"]);
        assert_eq!(app.default_runner().borrow().len(), 2);
        assert_eq!(fixed.borrow().len(), 1);
    }

    #[test]
    fn test_run_twice_fails_without_side_effects() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.run().unwrap();
        assert!(matches!(app.run(), Err(AppError::AlreadyRunning)));
        // Initialize ran once, membership unchanged.
        assert_eq!(*log.borrow(), vec!["init a"]);
        assert_eq!(app.default_runner().borrow().len(), 1);
    }

    #[test]
    fn test_stop_requires_running() {
        let mut app = app();
        assert!(matches!(app.stop(), Err(AppError::NotRunning)));
    }

    #[test]
    fn test_stop_removes_from_runner_but_keeps_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.run().unwrap();
        app.stop().unwrap();

        assert!(!app.is_running());
        assert!(app.default_runner().borrow().is_empty());
        assert_eq!(app.all_systems().len(), 1);
    }

    #[test]
    fn test_run_after_stop_does_not_reinitialize() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.run().unwrap();
        app.stop().unwrap();
        app.run().unwrap();

        assert_eq!(*log.borrow(), vec!["init a"], "initialize is one-shot");
        assert_eq!(app.default_runner().borrow().len(), 1);
    }

    #[test]
    fn test_late_registration_starts_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.run().unwrap();
        app.register_handle(Probe::new("late", &log));

        assert_eq!(*log.borrow(), vec!["init late"]);
        assert_eq!(app.default_runner().borrow().len(), 1);
    }

    #[test]
    fn test_dispose_disposes_each_system_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.register_handle(Probe::new("b", &log));
        app.run().unwrap();

        app.dispose();
        app.dispose();

        assert_eq!(
            *log.borrow(),
            vec!["init a", "init b", "dispose a", "dispose b"]
        );
        assert!(app.world().borrow().is_disposed());
    }

    #[test]
    fn test_disposed_app_rejects_lifecycle_calls() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.run().unwrap();
        app.dispose();

        assert!(matches!(app.run(), Err(AppError::Disposed)));
        assert!(matches!(app.stop(), Err(AppError::Disposed)));
        assert!(!app.is_running());
        // Disposed systems stay unwired.
        assert!(app.default_runner().borrow().is_empty());
        assert_eq!(*log.borrow(), vec!["init a", "dispose a"]);
    }

    #[test]
    fn test_dispose_spares_caller_supplied_world() {
        let mut registry = WorldRegistry::new();
        let world = registry.create();
        let mut app = ArchApp::with_world(world.clone());
        app.dispose();
        assert!(!world.borrow().is_disposed());
    }

    #[test]
    fn test_typed_system_lookup() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.register(Other);
        app.register_handle(Probe::new("b", &log));

        assert!(app.get_system::<Probe>().is_some());
        assert!(app.get_system::<Other>().is_some());
        assert_eq!(app.get_systems::<Probe>().len(), 2);
        assert_eq!(app.all_systems().len(), 3);
    }

    #[test]
    fn test_ticking_runs_updates_in_add_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = app();
        app.register_handle(Probe::new("a", &log));
        app.register_handle(Probe::new("b", &log));
        app.run().unwrap();
        log.borrow_mut().clear();

        let runner = app.default_runner();
        runner.borrow().tick(&mut app.world().borrow_mut(), 0.016);
        assert_eq!(*log.borrow(), vec!["update a", "update b"]);
    }
}
