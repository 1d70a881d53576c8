//! End-to-end: an app ticking systems against a world while a hierarchy
//! builder snapshots it.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use arch_app::{ArchApp, System, TickRunner};
use arch_inspect::{ComponentFilter, HierarchyBuilder, NodeKind};
use arch_store::{ComponentTypeId, World, WorldRegistry};

fn position() -> ComponentTypeId {
    ComponentTypeId::from_name("Position")
}

/// Spawns one Position-carrying entity per tick.
struct Spawner {
    spawned: u32,
}

impl System for Spawner {
    fn update(&mut self, world: &mut World, _dt: f64) {
        let entity = world.spawn().expect("world alive while app runs");
        world
            .set_component(entity, position(), json!({"x": 0.0, "y": 0.0}))
            .expect("entity just spawned");
        self.spawned += 1;
    }
}

#[test]
fn app_ticks_feed_the_hierarchy_view() {
    let mut registry = WorldRegistry::new();
    let mut app = ArchApp::new(&mut registry);
    app.register(Spawner { spawned: 0 });
    app.run().unwrap();

    let world = app.world();
    let runner = app.default_runner();
    let mut builder = HierarchyBuilder::new();
    let filter = ComponentFilter::new().enabled(true).require(position());

    // Nothing spawned yet: root + world node only.
    builder.rebuild(Some(&world.borrow()), &filter);
    assert_eq!(builder.len(), 2);

    for _ in 0..3 {
        runner.borrow().tick(&mut world.borrow_mut(), 1.0 / 60.0);
    }

    // The world mutated under the builder; the dirty check notices.
    assert!(builder.needs_rebuild(Some(&world.borrow()), &filter));
    builder.rebuild(Some(&world.borrow()), &filter);
    assert_eq!(builder.len(), 5, "root + world + three spawned entities");

    // Select the first entity node and resolve it back to the store.
    let (node_id, node) = builder
        .iter()
        .find(|(_, node)| node.kind == NodeKind::Entity)
        .expect("at least one entity node");
    let entity = node.entity.unwrap();
    let selection = builder.select(node_id, &world).unwrap();
    assert_eq!(selection.entity, entity);
    assert!(selection.world.borrow().is_alive(entity));

    app.stop().unwrap();
    runner.borrow().tick(&mut world.borrow_mut(), 1.0 / 60.0);
    builder.rebuild(Some(&world.borrow()), &filter);
    assert_eq!(builder.len(), 5, "stopped app must not keep spawning");

    app.dispose();
    assert!(world.borrow().is_disposed());
    builder.rebuild(None, &ComponentFilter::new());
    assert_eq!(builder.len(), 1, "no world selected is a valid state");
}

/// Stop and re-run keep systems registered and resume ticking.
#[test]
fn stop_then_run_resumes_registered_systems() {
    let ticks = Rc::new(RefCell::new(0u32));

    struct Counter(Rc<RefCell<u32>>);
    impl System for Counter {
        fn update(&mut self, _world: &mut World, _dt: f64) {
            *self.0.borrow_mut() += 1;
        }
    }

    let mut registry = WorldRegistry::new();
    let mut app = ArchApp::new(&mut registry);
    app.register(Counter(ticks.clone()));
    app.run().unwrap();

    let world = app.world();
    let runner = app.default_runner();
    runner.borrow().tick(&mut world.borrow_mut(), 0.016);
    app.stop().unwrap();
    runner.borrow().tick(&mut world.borrow_mut(), 0.016);
    assert_eq!(*ticks.borrow(), 1, "stopped systems must not tick");

    app.run().unwrap();
    runner.borrow().tick(&mut world.borrow_mut(), 0.016);
    assert_eq!(*ticks.borrow(), 2);
    app.dispose();
}

/// Systems on a secondary runner tick independently of the default one.
#[test]
fn named_runners_tick_independently() {
    let updates = Rc::new(RefCell::new(Vec::<&'static str>::new()));

    struct Tagged(&'static str, Rc<RefCell<Vec<&'static str>>>);
    impl System for Tagged {
        fn update(&mut self, _world: &mut World, _dt: f64) {
            self.1.borrow_mut().push(self.0);
        }
    }

    let mut registry = WorldRegistry::new();
    let mut app = ArchApp::new(&mut registry);
    let fixed = TickRunner::new("fixed").into_handle();

    app.register(Tagged("update", updates.clone()));
    app.register_on(
        arch_app::system::handle(Tagged("fixed", updates.clone())),
        fixed.clone(),
    );
    app.run().unwrap();

    let world = app.world();
    app.default_runner()
        .borrow()
        .tick(&mut world.borrow_mut(), 0.016);
    fixed.borrow().tick(&mut world.borrow_mut(), 0.02);
    fixed.borrow().tick(&mut world.borrow_mut(), 0.02);

    assert_eq!(*updates.borrow(), vec!["update", "fixed", "fixed"]);
    app.dispose();
}
