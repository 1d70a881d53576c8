//! World — runtime entity-component storage with dynamic typing.
//!
//! Components are not Rust types here; they are [`serde_json::Value`]
//! payloads keyed by [`ComponentTypeId`]. The inspector core only ever
//! asks "which types does this entity carry" and "what is its name", so
//! dynamic payloads are all the storage this boundary needs.
//!
//! Entities live in versioned slots. Despawning bumps the slot version
//! and pushes the index onto a free list; a later spawn reuses the slot
//! under the new version, so [`EntityRef`]s taken before the reuse fail
//! [`World::is_alive`] instead of aliasing the new entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::component::{ComponentTypeId, well_known};
use crate::entity::EntityRef;

/// Stable numeric identity of a world, allocated by the
/// [`WorldRegistry`](crate::WorldRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u64);

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "World({})", self.0)
    }
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world is disposed")]
    Disposed,
    #[error("entity {0} not found")]
    EntityNotFound(EntityRef),
    #[error("component {0:?} not found on entity {1}")]
    ComponentNotFound(ComponentTypeId, EntityRef),
}

/// One entity slot. `components` is `Some` while the slot is occupied.
#[derive(Debug, Default)]
struct Slot {
    version: u32,
    components: Option<HashMap<ComponentTypeId, Value>>,
}

/// Entity/component storage for a single world.
///
/// Single-threaded by design: callers on other threads must add their
/// own synchronization, the world provides none.
#[derive(Debug)]
pub struct World {
    id: WorldId,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live_count: usize,
    /// Incremented on every mutation. Callers that cache derived views
    /// (e.g. the hierarchy builder) compare this to decide whether a
    /// rebuild is due.
    change_tick: u64,
    disposed: bool,
}

impl World {
    /// Create a new empty world with the given identity.
    ///
    /// Worlds are normally created through
    /// [`WorldRegistry::create`](crate::WorldRegistry::create), which
    /// allocates the ID and registers the world for enumeration.
    #[must_use]
    pub fn new(id: WorldId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            free: Vec::new(),
            live_count: 0,
            change_tick: 0,
            disposed: false,
        }
    }

    /// Returns this world's identity.
    #[must_use]
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Human-readable label for this world, e.g. `"World(3)"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.id.to_string()
    }

    /// Returns the mutation counter. Any spawn, despawn, or component
    /// change advances it.
    #[must_use]
    pub fn change_tick(&self) -> u64 {
        self.change_tick
    }

    /// Returns `true` once [`World::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // -- Entity lifecycle --

    /// Spawn a new entity with no components, reusing a free slot when
    /// one is available.
    pub fn spawn(&mut self) -> Result<EntityRef, WorldError> {
        if self.disposed {
            return Err(WorldError::Disposed);
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.components = Some(HashMap::new());
        self.live_count += 1;
        self.change_tick += 1;

        Ok(EntityRef::new(index, slot.version))
    }

    /// Spawn a new entity carrying a `"Name"` component.
    pub fn spawn_named(&mut self, name: &str) -> Result<EntityRef, WorldError> {
        let entity = self.spawn()?;
        self.set_component(entity, well_known::NAME, Value::String(name.to_string()))?;
        Ok(entity)
    }

    /// Despawn an entity, removing all its components.
    ///
    /// Returns `true` if the entity was alive. Despawning a stale or
    /// unknown reference is a no-op.
    pub fn despawn(&mut self, entity: EntityRef) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };
        slot.components = None;
        slot.version = slot.version.wrapping_add(1);
        self.free.push(entity.index);
        self.live_count -= 1;
        self.change_tick += 1;
        true
    }

    /// Check whether a reference still points at a live entity.
    ///
    /// Stale references (despawned, or their slot reused) and references
    /// into a disposed world return `false`.
    #[must_use]
    pub fn is_alive(&self, entity: EntityRef) -> bool {
        self.slot(entity).is_some()
    }

    /// Iterate all live entities in slot-index order.
    ///
    /// The order is a storage artifact, not a guarantee — callers must
    /// not attach meaning to it beyond "whatever the store yields".
    pub fn entities(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.components
                .as_ref()
                .map(|_| EntityRef::new(index as u32, slot.version))
        })
    }

    /// Returns the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.live_count
    }

    // -- Component operations --

    /// Set a component payload on an entity, replacing any previous
    /// payload of the same type.
    pub fn set_component(
        &mut self,
        entity: EntityRef,
        type_id: ComponentTypeId,
        value: Value,
    ) -> Result<(), WorldError> {
        let slot = self
            .slot_mut(entity)
            .ok_or(WorldError::EntityNotFound(entity))?;
        slot.components
            .as_mut()
            .ok_or(WorldError::EntityNotFound(entity))?
            .insert(type_id, value);
        self.change_tick += 1;
        Ok(())
    }

    /// Get a component payload from an entity, or `None` if the entity
    /// is dead or does not carry the type.
    #[must_use]
    pub fn get_component(&self, entity: EntityRef, type_id: ComponentTypeId) -> Option<&Value> {
        self.slot(entity)?.components.as_ref()?.get(&type_id)
    }

    /// Remove a component from an entity.
    pub fn remove_component(
        &mut self,
        entity: EntityRef,
        type_id: ComponentTypeId,
    ) -> Result<(), WorldError> {
        let slot = self
            .slot_mut(entity)
            .ok_or(WorldError::EntityNotFound(entity))?;
        let components = slot
            .components
            .as_mut()
            .ok_or(WorldError::EntityNotFound(entity))?;
        if components.remove(&type_id).is_none() {
            return Err(WorldError::ComponentNotFound(type_id, entity));
        }
        self.change_tick += 1;
        Ok(())
    }

    /// Iterate the component types attached to an entity, or `None` if
    /// the reference is stale. The set may be empty.
    pub fn component_types(
        &self,
        entity: EntityRef,
    ) -> Option<impl Iterator<Item = ComponentTypeId> + '_> {
        Some(self.slot(entity)?.components.as_ref()?.keys().copied())
    }

    /// Returns `true` if the entity is alive and carries every type in
    /// `required` (logical AND — set containment, not overlap).
    pub fn has_all<I>(&self, entity: EntityRef, required: I) -> bool
    where
        I: IntoIterator<Item = ComponentTypeId>,
    {
        let Some(slot) = self.slot(entity) else {
            return false;
        };
        let Some(components) = slot.components.as_ref() else {
            return false;
        };
        required.into_iter().all(|ty| components.contains_key(&ty))
    }

    /// Display name for an entity: the `"Name"` component's string when
    /// present, otherwise the synthetic `Entity(<index>:<version>)` label.
    #[must_use]
    pub fn display_name(&self, entity: EntityRef) -> String {
        match self.get_component(entity, well_known::NAME) {
            Some(Value::String(name)) => name.clone(),
            _ => entity.to_string(),
        }
    }

    // -- Disposal --

    /// Release all entities and components and mark the world disposed.
    ///
    /// Idempotent. After disposal every reference is dead, `spawn`
    /// fails, and the registry stops enumerating this world.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.slots.clear();
        self.free.clear();
        self.live_count = 0;
        self.change_tick += 1;
        self.disposed = true;
        debug!(world = %self.id, "world disposed");
    }

    fn slot(&self, entity: EntityRef) -> Option<&Slot> {
        let slot = self.slots.get(entity.index as usize)?;
        (slot.version == entity.version && slot.components.is_some()).then_some(slot)
    }

    fn slot_mut(&mut self, entity: EntityRef) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(entity.index as usize)?;
        (slot.version == entity.version && slot.components.is_some()).then_some(slot)
    }
}
