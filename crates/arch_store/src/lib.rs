//! # arch_store
//!
//! The entity-store side of the inspector core. Defines what an entity
//! reference is, how component types are identified, and provides a
//! map-backed [`World`] plus an explicit [`WorldRegistry`] for "which
//! stores exist" enumeration.
//!
//! This crate provides:
//!
//! - [`EntityRef`] — index + version entity references with staleness
//!   detection across slot reuse.
//! - [`ComponentTypeId`] — name-derived component type descriptors used
//!   as filter keys.
//! - [`World`] — dynamically-typed entity/component storage.
//! - [`WorldRegistry`] — explicit registry of live worlds.

pub mod component;
pub mod entity;
pub mod registry;
pub mod world;

pub use component::{ComponentTypeId, well_known};
pub use entity::EntityRef;
pub use registry::{WorldHandle, WorldRegistry};
pub use world::{World, WorldError, WorldId};
