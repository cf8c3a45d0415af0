use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GarageError, Result};

use super::{FuelEntry, GarageRepository, Vehicle};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Persisted aggregate holding every vehicle and fuel entry of one garage file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garage {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub fuel_entries: Vec<FuelEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Garage::schema_version_default")]
    pub schema_version: u8,
}

impl Garage {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            vehicles: Vec::new(),
            fuel_entries: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn vehicle_ref(&self, id: Uuid) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    fn vehicle_mut(&mut self, id: Uuid) -> Result<&mut Vehicle> {
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .ok_or(GarageError::VehicleNotFound(id))
    }

    fn entry_mut(&mut self, id: Uuid) -> Result<&mut FuelEntry> {
        self.fuel_entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(GarageError::FuelEntryNotFound(id))
    }

    pub fn entry_count(&self) -> usize {
        self.fuel_entries.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Detects entries pointing at vehicles that no longer exist.
    pub fn warnings(&self) -> Vec<String> {
        self.fuel_entries
            .iter()
            .filter(|entry| self.vehicle_ref(entry.vehicle_id).is_none())
            .map(|entry| {
                format!(
                    "fuel entry {} references unknown vehicle {}",
                    entry.id, entry.vehicle_id
                )
            })
            .collect()
    }
}

impl GarageRepository for Garage {
    fn insert_vehicle(&mut self, vehicle: Vehicle) -> Result<Uuid> {
        let id = vehicle.id;
        self.vehicles.push(vehicle);
        self.touch();
        Ok(id)
    }

    fn vehicle(&self, id: Uuid) -> Result<Vehicle> {
        self.vehicle_ref(id)
            .cloned()
            .ok_or(GarageError::VehicleNotFound(id))
    }

    fn list_vehicles(&self, owner_id: Uuid) -> Result<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|vehicle| vehicle.owner_id == owner_id)
            .cloned()
            .collect();
        vehicles.sort_by_key(|vehicle| Reverse(vehicle.created_at));
        Ok(vehicles)
    }

    fn update_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        let slot = self.vehicle_mut(vehicle.id)?;
        *slot = vehicle;
        self.touch();
        Ok(())
    }

    fn delete_vehicle(&mut self, id: Uuid) -> Result<()> {
        let before = self.vehicles.len();
        self.vehicles.retain(|vehicle| vehicle.id != id);
        if self.vehicles.len() == before {
            return Err(GarageError::VehicleNotFound(id));
        }
        self.fuel_entries.retain(|entry| entry.vehicle_id != id);
        self.touch();
        Ok(())
    }

    fn update_vehicle_odometer(&mut self, id: Uuid, odometer_km: u32) -> Result<()> {
        self.vehicle_mut(id)?.current_odometer_km = odometer_km;
        self.touch();
        Ok(())
    }

    fn update_vehicle_service_record(
        &mut self,
        id: Uuid,
        date: NaiveDate,
        odometer_km: u32,
    ) -> Result<()> {
        self.vehicle_mut(id)?.record_service(date, odometer_km);
        self.touch();
        Ok(())
    }

    fn insert_fuel_entry(&mut self, entry: FuelEntry) -> Result<Uuid> {
        if self.vehicle_ref(entry.vehicle_id).is_none() {
            return Err(GarageError::VehicleNotFound(entry.vehicle_id));
        }
        let id = entry.id;
        self.fuel_entries.push(entry);
        self.touch();
        Ok(id)
    }

    fn fuel_entry(&self, id: Uuid) -> Result<FuelEntry> {
        self.fuel_entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or(GarageError::FuelEntryNotFound(id))
    }

    fn list_fuel_entries(&self, vehicle_id: Uuid) -> Result<Vec<FuelEntry>> {
        let mut entries: Vec<FuelEntry> = self
            .fuel_entries
            .iter()
            .filter(|entry| entry.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| Reverse((entry.date, entry.created_at)));
        Ok(entries)
    }

    fn list_capacity_fill_entries(
        &self,
        vehicle_id: Uuid,
        max_odometer_km: u32,
    ) -> Result<Vec<FuelEntry>> {
        let mut entries: Vec<FuelEntry> = self
            .fuel_entries
            .iter()
            .filter(|entry| {
                entry.vehicle_id == vehicle_id
                    && entry.is_full_tank
                    && entry.odometer_km < max_odometer_km
            })
            .cloned()
            .collect();
        entries.sort_by_key(|entry| Reverse(entry.odometer_km));
        Ok(entries)
    }

    fn update_fuel_entry(&mut self, entry: FuelEntry) -> Result<()> {
        let slot = self.entry_mut(entry.id)?;
        *slot = entry;
        self.touch();
        Ok(())
    }

    fn delete_fuel_entry(&mut self, id: Uuid) -> Result<()> {
        let before = self.fuel_entries.len();
        self.fuel_entries.retain(|entry| entry.id != id);
        if self.fuel_entries.len() == before {
            return Err(GarageError::FuelEntryNotFound(id));
        }
        self.touch();
        Ok(())
    }
}
