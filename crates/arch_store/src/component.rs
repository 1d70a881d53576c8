//! Component type descriptors.
//!
//! A [`ComponentTypeId`] identifies a component's shape. The inspector
//! core never looks inside component data — type IDs exist purely as
//! filter keys (set membership), so they are derived deterministically
//! from the component's **string name** using the FNV-1a 64-bit hash.
//! Any party that knows the name can compute the same ID.

use serde::{Deserialize, Serialize};

/// A unique identifier for a component type, derived from its string name
/// using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] from a component's string name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

/// Component types with meaning to the inspector core itself.
pub mod well_known {
    use super::ComponentTypeId;

    /// The `"Name"` component. Its payload is a JSON string; when present
    /// on an entity it supplies the entity's human-readable display name.
    pub const NAME: ComponentTypeId = ComponentTypeId::from_name("Name");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_is_deterministic() {
        let a = ComponentTypeId::from_name("Position");
        let b = ComponentTypeId::from_name("Position");
        assert_eq!(a, b);
    }

    #[test]
    fn test_type_id_differs_between_names() {
        assert_ne!(
            ComponentTypeId::from_name("Position"),
            ComponentTypeId::from_name("Velocity")
        );
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 64-bit of the empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_well_known_name_matches_from_name() {
        assert_eq!(well_known::NAME, ComponentTypeId::from_name("Name"));
    }
}
