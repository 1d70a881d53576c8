//! Headless inspector session.
//!
//! Creates a world, runs a couple of systems for a handful of ticks,
//! and prints the filtered hierarchy the way an editor panel would
//! render it.

use anyhow::Result;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arch_app::{ArchApp, System};
use arch_inspect::{ComponentFilter, HierarchyBuilder};
use arch_store::{ComponentTypeId, World, WorldRegistry};

fn position() -> ComponentTypeId {
    ComponentTypeId::from_name("Position")
}

fn velocity() -> ComponentTypeId {
    ComponentTypeId::from_name("Velocity")
}

/// Seeds the scene on initialize, then drifts every Position each tick.
struct Movement;

impl System for Movement {
    fn initialize(&mut self, world: &mut World) {
        let player = world.spawn_named("Player").expect("fresh world");
        world
            .set_component(player, position(), json!({"x": 0.0, "y": 0.0}))
            .expect("player alive");
        world
            .set_component(player, velocity(), json!({"x": 1.0, "y": 0.0}))
            .expect("player alive");

        let marker = world.spawn_named("SpawnPoint").expect("fresh world");
        world
            .set_component(marker, position(), json!({"x": 4.0, "y": 2.0}))
            .expect("marker alive");

        // A bare entity, to show up only when the filter is off.
        world.spawn().expect("fresh world");
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let movers: Vec<_> = world
            .entities()
            .filter(|&e| world.has_all(e, [position(), velocity()]))
            .collect();
        for entity in movers {
            let (Some(p), Some(v)) = (
                world.get_component(entity, position()).cloned(),
                world.get_component(entity, velocity()).cloned(),
            ) else {
                continue;
            };
            let moved = json!({
                "x": p["x"].as_f64().unwrap_or(0.0) + v["x"].as_f64().unwrap_or(0.0) * dt,
                "y": p["y"].as_f64().unwrap_or(0.0) + v["y"].as_f64().unwrap_or(0.0) * dt,
            });
            let _ = world.set_component(entity, position(), moved);
        }
    }
}

fn print_tree(builder: &HierarchyBuilder) {
    for (_, node) in builder.iter() {
        let indent = "  ".repeat((node.depth + 1) as usize);
        println!("{indent}{}", node.display_name);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("demo=info".parse()?))
        .init();

    let mut registry = WorldRegistry::new();
    let mut app = ArchApp::new(&mut registry);
    app.register(Movement);
    app.run()?;

    let world = app.world();
    let runner = app.default_runner();
    for _ in 0..5 {
        runner.borrow().tick(&mut world.borrow_mut(), 1.0 / 60.0);
    }
    info!(entities = world.borrow().entity_count(), "ticked 5 frames");

    let mut builder = HierarchyBuilder::new();

    println!("-- unfiltered --");
    builder.rebuild(Some(&world.borrow()), &ComponentFilter::new());
    print_tree(&builder);

    println!("-- Position + Velocity --");
    let filter = ComponentFilter::new()
        .enabled(true)
        .require(position())
        .require(velocity());
    builder.rebuild(Some(&world.borrow()), &filter);
    print_tree(&builder);

    app.stop()?;
    app.dispose();
    Ok(())
}
