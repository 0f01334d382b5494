//! Charging slot allocation and the FIFO wait queue.
//!
//! A [`ChargingStation`] owns a bounded set of in-service handles and an
//! ordered wait queue. Admission only enters the queue; service is granted
//! once per tick by [`ChargingStation::reconcile`], which first frees the
//! slots of entities that stopped charging and then fills free slots from
//! the head of the queue.
//!
//! The station is generic over the handle type `K` and reaches entities
//! only through [`ChargeableLookup`], so it has no knowledge of vehicles.

use std::collections::VecDeque;
use std::fmt::Debug;

use crate::chargeable::{Chargeable, ChargeableLookup};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    #[error("a charging station needs at least one slot")]
    ZeroCapacity,
    /// Admission of an entity that is not in its post-flight state. This
    /// covers entities that are already queued or in service.
    #[error("protocol violation: {0} is not awaiting queue entry")]
    NotAwaitingEntry(String),
    #[error("handle {0} does not resolve to a chargeable entity")]
    UnresolvedHandle(String),
}

// ---------------------------------------------------------------------------
// Reconcile outcome
// ---------------------------------------------------------------------------

/// Handles that changed status during one [`ChargingStation::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome<K> {
    /// Entities that finished charging and left their slot.
    pub released: Vec<K>,
    /// Entities that left the queue and started charging, in queue order.
    pub started: Vec<K>,
}

impl<K> Default for ReconcileOutcome<K> {
    fn default() -> Self {
        Self {
            released: Vec::new(),
            started: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Charging station
// ---------------------------------------------------------------------------

/// A fixed bank of charging slots shared by every queued entity.
///
/// Every handle is in at most one of the wait queue and the in-service set,
/// and the in-service set never exceeds the slot capacity.
#[derive(Debug, Clone)]
pub struct ChargingStation<K> {
    capacity: usize,
    wait_queue: VecDeque<K>,
    in_service: Vec<K>,
}

impl<K> ChargingStation<K>
where
    K: Copy + Eq + Debug,
{
    /// Create a station with `capacity` charging slots.
    pub fn new(capacity: usize) -> Result<Self, StationError> {
        if capacity == 0 {
            return Err(StationError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            wait_queue: VecDeque::new(),
            in_service: Vec::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn in_service_len(&self) -> usize {
        self.in_service.len()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity - self.in_service.len()
    }

    /// Queued handles from head (next to be served) to tail.
    pub fn queued(&self) -> impl Iterator<Item = &K> + '_ {
        self.wait_queue.iter()
    }

    /// Handles currently occupying a slot.
    pub fn in_service(&self) -> &[K] {
        &self.in_service
    }

    pub fn is_queued(&self, key: K) -> bool {
        self.wait_queue.contains(&key)
    }

    pub fn is_in_service(&self, key: K) -> bool {
        self.in_service.contains(&key)
    }

    /// Append `key` to the tail of the wait queue and mark the entity as
    /// queued. No capacity check: admission does not guarantee service.
    ///
    /// # Errors
    ///
    /// [`StationError::NotAwaitingEntry`] if the entity is not in its
    /// post-flight state. An entity already queued or in service never is,
    /// so double admission is caught without extra bookkeeping.
    pub fn admit(&mut self, key: K, entity: &mut dyn Chargeable) -> Result<(), StationError> {
        if !entity.is_awaiting_queue_entry() {
            tracing::error!(?key, "admission of an entity that did not just land");
            return Err(StationError::NotAwaitingEntry(format!("{key:?}")));
        }
        self.wait_queue.push_back(key);
        entity.mark_queued();
        tracing::debug!(?key, queue_len = self.wait_queue.len(), "entity queued for charging");
        Ok(())
    }

    /// Release finished entities and fill free slots in FIFO order.
    ///
    /// Called once per tick after every entity has been advanced.
    ///
    /// # Errors
    ///
    /// [`StationError::UnresolvedHandle`] if an in-service or head-of-queue
    /// handle no longer resolves through `lookup`. The station is not
    /// modified when an in-service handle fails to resolve.
    pub fn reconcile<L>(&mut self, lookup: &mut L) -> Result<ReconcileOutcome<K>, StationError>
    where
        L: ChargeableLookup<K> + ?Sized,
    {
        let mut outcome = ReconcileOutcome::default();

        // Phase 1: free the slots of entities whose own state machine moved
        // them out of charging.
        let mut still_charging = Vec::with_capacity(self.in_service.len());
        for &key in &self.in_service {
            let entity = lookup
                .chargeable(key)
                .ok_or_else(|| StationError::UnresolvedHandle(format!("{key:?}")))?;
            still_charging.push(entity.is_charging());
        }
        let mut flags = still_charging.into_iter();
        self.in_service.retain(|&key| {
            let charging = flags.next().unwrap_or(false);
            if !charging {
                outcome.released.push(key);
            }
            charging
        });
        for key in &outcome.released {
            tracing::debug!(?key, "charging slot released");
        }

        // Phase 2: serve the queue head while slots are free.
        while self.in_service.len() < self.capacity {
            let Some(&key) = self.wait_queue.front() else {
                break;
            };
            let entity = lookup
                .chargeable_mut(key)
                .ok_or_else(|| StationError::UnresolvedHandle(format!("{key:?}")))?;
            entity.mark_charging();
            self.wait_queue.pop_front();
            self.in_service.push(key);
            outcome.started.push(key);
            tracing::debug!(?key, in_service = self.in_service.len(), "charging started");
        }

        Ok(outcome)
    }
}
