//! Hierarchy snapshot builder.
//!
//! Produces the root → world → entities tree the inspector displays.
//! The tree is pull-based: callers poll [`HierarchyBuilder::needs_rebuild`]
//! and invoke [`HierarchyBuilder::rebuild`] only when the world or the
//! filter actually changed. A rebuild invalidates every [`NodeId`] from
//! the previous tree.

use arch_store::{EntityRef, World, WorldHandle, WorldId};
use tracing::debug;

use crate::arena::{Node, NodeArena, NodeId, NodeKind};
use crate::filter::ComponentFilter;

/// The currently inspected entity, handed to external UI when an entity
/// node is selected.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The world the entity lives in.
    pub world: WorldHandle,
    /// The selected entity. Liveness was checked at selection time and
    /// may lapse afterwards.
    pub entity: EntityRef,
}

/// Builds and owns the hierarchy tree.
///
/// The builder exclusively owns its node pool; callers only ever see
/// `&Node`. Every rebuild discards the previous tree wholesale and
/// recycles its nodes.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    arena: NodeArena,
    /// Node handles in display order: root, world, entities.
    order: Vec<NodeId>,
    root: Option<NodeId>,
    /// `(world id, change tick)` observed at the last rebuild; `None`
    /// inside the option means the last rebuild had no world selected.
    last_world: Option<Option<(WorldId, u64)>>,
    last_filter: Option<ComponentFilter>,
}

impl HierarchyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the snapshot is out of date: never built, a
    /// different world selected, the world mutated since the last
    /// rebuild, or the filter changed.
    #[must_use]
    pub fn needs_rebuild(&self, world: Option<&World>, filter: &ComponentFilter) -> bool {
        let current = world.map(|w| (w.id(), w.change_tick()));
        self.last_world != Some(current) || self.last_filter.as_ref() != Some(filter)
    }

    /// Rebuild the tree from the given world and filter.
    ///
    /// `world == None` is a valid state ("no store selected") and yields
    /// a tree holding only the synthetic root. Entities that die while
    /// the world is being walked are skipped silently.
    pub fn rebuild(&mut self, world: Option<&World>, filter: &ComponentFilter) {
        self.arena.recycle_all();
        self.order.clear();

        let root = self.arena.alloc(Node {
            depth: -1,
            display_name: "Root".to_string(),
            kind: NodeKind::Root,
            entity: None,
        });
        self.root = Some(root);
        self.order.push(root);

        let mut included = 0usize;
        let mut total = 0usize;

        if let Some(world) = world {
            let world_node = self.arena.alloc(Node {
                depth: 0,
                display_name: world.label(),
                kind: NodeKind::World,
                entity: None,
            });
            self.order.push(world_node);

            for entity in world.entities() {
                total += 1;
                // Liveness can lapse between enumeration and inspection;
                // a dead entity simply fails the checks below.
                if !world.is_alive(entity) || !filter.matches(world, entity) {
                    continue;
                }
                let node = self.arena.alloc(Node {
                    depth: 1,
                    display_name: world.display_name(entity),
                    kind: NodeKind::Entity,
                    entity: Some(entity),
                });
                self.order.push(node);
                included += 1;
            }
        }

        self.last_world = Some(world.map(|w| (w.id(), w.change_tick())));
        self.last_filter = Some(filter.clone());

        debug!(
            world = world.map(|w| w.id().0),
            entities = total,
            included,
            filtered = filter.is_active(),
            "hierarchy rebuilt"
        );
    }

    /// Handle of the synthetic root, or `None` before the first rebuild.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Resolve a node handle against the current tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Iterate the current tree in display order (root first, then the
    /// world node, then entities in store order).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.order
            .iter()
            .filter_map(|&id| self.arena.get(id).map(|node| (id, node)))
    }

    /// Number of nodes in the current tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Turn a picked node into a [`Selection`].
    ///
    /// Entity nodes whose entity is still alive yield a selection;
    /// anything else — root or world nodes, stale handles, entities that
    /// died since the rebuild — clears the selection by returning `None`.
    #[must_use]
    pub fn select(&self, id: NodeId, world: &WorldHandle) -> Option<Selection> {
        let node = self.get(id)?;
        if node.kind != NodeKind::Entity {
            return None;
        }
        let entity = node.entity?;
        if !world.borrow().is_alive(entity) {
            return None;
        }
        Some(Selection {
            world: world.clone(),
            entity,
        })
    }
}
