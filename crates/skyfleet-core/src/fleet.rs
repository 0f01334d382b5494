//! Ownership of every vehicle in the simulation.

use slotmap::SlotMap;

use crate::chargeable::{Chargeable, ChargeableLookup};
use crate::id::VehicleId;
use crate::vehicle::Vehicle;

/// Slotmap-backed vehicle storage. Handles handed to the charging station
/// are the [`VehicleId`] keys of this map.
#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: SlotMap<VehicleId, Vehicle>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vehicle: Vehicle) -> VehicleId {
        self.vehicles.insert(vehicle)
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicle IDs in storage order.
    pub fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> {
        self.vehicles.iter()
    }
}

impl ChargeableLookup<VehicleId> for Fleet {
    fn chargeable(&self, key: VehicleId) -> Option<&dyn Chargeable> {
        self.vehicles.get(key).map(|v| v as &dyn Chargeable)
    }

    fn chargeable_mut(&mut self, key: VehicleId) -> Option<&mut dyn Chargeable> {
        self.vehicles.get_mut(key).map(|v| v as &mut dyn Chargeable)
    }
}
