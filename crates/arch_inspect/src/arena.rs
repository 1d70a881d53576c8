//! Pooled tree nodes with generation-checked handles.
//!
//! The hierarchy is rebuilt often (every time the caller notices the
//! world changed), so nodes live in a slot arena that is recycled
//! wholesale at the start of each rebuild instead of reallocated.
//! Recycling a slot bumps its generation; [`NodeId`]s handed out during
//! a previous rebuild then resolve to `None` rather than to whichever
//! node happens to occupy the slot now.

use arch_store::EntityRef;

/// Handle to a node in a [`NodeArena`].
///
/// Valid only until the arena's next recycle; stale handles resolve to
/// `None` on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// What a tree node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic tree root. Carries no store data.
    Root,
    /// A world node, labeled with the store's identity.
    World,
    /// A live entity at rebuild time.
    Entity,
}

/// One node of the hierarchy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Tree depth. The synthetic root sits at `-1`, the world node at
    /// `0`, entities at `1`.
    pub depth: i32,
    /// Human-readable label.
    pub display_name: String,
    pub kind: NodeKind,
    /// Present only on [`NodeKind::Entity`] nodes. Validated live at
    /// rebuild time; may go stale immediately after.
    pub entity: Option<EntityRef>,
}

#[derive(Debug, Default)]
struct ArenaSlot {
    generation: u32,
    node: Option<Node>,
}

/// Slot arena owning the current tree's nodes.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<ArenaSlot>,
    free: Vec<u32>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a node into a free slot (reusing one when available) and
    /// return its handle.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(ArenaSlot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.node = Some(node);
        NodeId {
            index,
            generation: slot.generation,
        }
    }

    /// Resolve a handle, returning `None` for handles from before the
    /// last recycle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Return every occupied slot to the pool, invalidating all
    /// outstanding handles.
    pub fn recycle_all(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        // Pop order re-fills low indices first.
        self.free.reverse();
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
