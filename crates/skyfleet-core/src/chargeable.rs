//! The capability a charging station operates on.
//!
//! The station never sees a concrete vehicle type. It holds opaque handles
//! and resolves them through a [`ChargeableLookup`] into `dyn Chargeable`
//! trait objects exposing exactly four operations.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

// ---------------------------------------------------------------------------
// Chargeable trait
// ---------------------------------------------------------------------------

/// An entity that can wait for and occupy a charging slot.
pub trait Chargeable {
    /// Enter the charging state. Only called when the entity is admitted to
    /// a free slot.
    fn mark_charging(&mut self);

    /// True exactly while the entity is charging.
    fn is_charging(&self) -> bool;

    /// Enter the waiting-in-queue state.
    fn mark_queued(&mut self);

    /// True exactly in the transient post-flight, pre-queue state.
    fn is_awaiting_queue_entry(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Handle resolution
// ---------------------------------------------------------------------------

/// Resolves station handles into chargeable entities.
///
/// Returns `None` when the handle does not name a live entity.
pub trait ChargeableLookup<K> {
    fn chargeable(&self, key: K) -> Option<&dyn Chargeable>;

    fn chargeable_mut(&mut self, key: K) -> Option<&mut dyn Chargeable>;
}

impl<K, C, S> ChargeableLookup<K> for HashMap<K, C, S>
where
    K: Eq + Hash,
    C: Chargeable,
    S: BuildHasher,
{
    fn chargeable(&self, key: K) -> Option<&dyn Chargeable> {
        self.get(&key).map(|c| c as &dyn Chargeable)
    }

    fn chargeable_mut(&mut self, key: K) -> Option<&mut dyn Chargeable> {
        self.get_mut(&key).map(|c| c as &mut dyn Chargeable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockChargeable;

    #[test]
    fn hash_map_resolves_known_keys() {
        let mut map = HashMap::new();
        map.insert(1u32, MockChargeable::landed());

        assert!(map.chargeable(1).is_some());
        assert!(map.chargeable(2).is_none());

        let entity = map.chargeable_mut(1).unwrap();
        assert!(entity.is_awaiting_queue_entry());
        entity.mark_queued();
        assert!(!map[&1].is_awaiting_queue_entry());
    }

    #[test]
    fn mutations_go_through_trait_object() {
        let mut map = HashMap::new();
        map.insert("a", MockChargeable::landed());

        map.chargeable_mut("a").unwrap().mark_charging();
        assert!(map.chargeable("a").unwrap().is_charging());
    }
}
