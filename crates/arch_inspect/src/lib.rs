//! # arch_inspect
//!
//! Headless hierarchy view over a live [`arch_store::World`]: a pull-based,
//! incrementally-rebuilt snapshot of which entities exist, filterable by
//! the set of component types they carry.
//!
//! This crate provides:
//!
//! - [`ComponentFilter`] — "entity must carry all of these types".
//! - [`NodeArena`] / [`NodeId`] — pooled tree nodes with
//!   generation-checked handles.
//! - [`HierarchyBuilder`] — rebuilds the root → world → entities tree on
//!   demand and exposes the [`Selection`] proxy for the picked entity.
//!
//! The builder never mutates the world; the world is free to change
//! between rebuilds, and [`HierarchyBuilder::needs_rebuild`] tells the
//! caller when the snapshot has gone stale.

pub mod arena;
pub mod filter;
pub mod hierarchy;

pub use arena::{Node, NodeArena, NodeId, NodeKind};
pub use filter::ComponentFilter;
pub use hierarchy::{HierarchyBuilder, Selection};
