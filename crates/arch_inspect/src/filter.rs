//! Component-set filtering.

use std::collections::BTreeSet;

use arch_store::{ComponentTypeId, EntityRef, World};

/// Filters entities by the component types they carry.
///
/// Matching is set containment: an entity passes only if it carries
/// **every** required type (logical AND). Two states are deliberately
/// pass-everything: a disabled filter, and an enabled filter with an
/// empty required set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    /// When `false`, every entity passes regardless of `required`.
    pub enabled: bool,
    /// The component types an entity must carry to pass.
    pub required: BTreeSet<ComponentTypeId>,
}

impl ComponentFilter {
    /// Create a disabled filter with an empty required set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required component type (builder style).
    #[must_use]
    pub fn require(mut self, type_id: ComponentTypeId) -> Self {
        self.required.insert(type_id);
        self
    }

    /// Enable or disable the filter (builder style).
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Drop all required types, keeping the enabled flag.
    pub fn clear(&mut self) {
        self.required.clear();
    }

    /// Returns `true` if the filter currently constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.required.is_empty()
    }

    /// Test an entity against the filter.
    ///
    /// An inactive filter passes everything, including entities with no
    /// components at all. An active filter rejects dead entities — a
    /// stale reference can never satisfy a containment check.
    #[must_use]
    pub fn matches(&self, world: &World, entity: EntityRef) -> bool {
        if !self.is_active() {
            return true;
        }
        world.has_all(entity, self.required.iter().copied())
    }
}
