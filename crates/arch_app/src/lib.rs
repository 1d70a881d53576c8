//! # arch_app
//!
//! The application/composition root of the inspector core. An
//! [`ArchApp`] owns a world, partitions registered [`System`]s into
//! named [`Runner`] groups, and drives their initialize → start → stop →
//! dispose lifecycle uniformly.
//!
//! Runners decouple the scheduler from any particular tick source: the
//! bundled [`TickRunner`] is driven by an explicit `tick()` call, which
//! can come from a timer, a host engine's update event, or a test
//! harness.
//!
//! ## Usage
//!
//! ```rust
//! use arch_app::{ArchApp, System};
//! use arch_store::{World, WorldRegistry};
//!
//! struct Mover;
//!
//! impl System for Mover {
//!     fn update(&mut self, _world: &mut World, _dt: f64) {}
//! }
//!
//! let mut registry = WorldRegistry::new();
//! let mut app = ArchApp::new(&mut registry);
//! app.register(Mover);
//! app.run().unwrap();
//!
//! let runner = app.default_runner();
//! runner.borrow().tick(&mut app.world().borrow_mut(), 1.0 / 60.0);
//!
//! app.stop().unwrap();
//! app.dispose();
//! ```

pub mod app;
pub mod runner;
pub mod system;

pub use app::{AppError, ArchApp};
pub use runner::{Runner, RunnerHandle, TickRunner};
pub use system::{System, SystemHandle};
