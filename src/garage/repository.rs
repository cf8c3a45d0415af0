use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::Result;

use super::{FuelEntry, Vehicle};

/// Table-style record operations the services rely on.
///
/// Rows are returned by value, the way a remote table query would hand them
/// back. Implementations report missing rows as
/// [`GarageError::VehicleNotFound`](crate::errors::GarageError::VehicleNotFound) or
/// [`GarageError::FuelEntryNotFound`](crate::errors::GarageError::FuelEntryNotFound).
pub trait GarageRepository {
    fn insert_vehicle(&mut self, vehicle: Vehicle) -> Result<Uuid>;
    fn vehicle(&self, id: Uuid) -> Result<Vehicle>;
    /// Vehicles owned by `owner_id`, newest first.
    fn list_vehicles(&self, owner_id: Uuid) -> Result<Vec<Vehicle>>;
    fn update_vehicle(&mut self, vehicle: Vehicle) -> Result<()>;
    /// Removes the vehicle together with its fuel entries.
    fn delete_vehicle(&mut self, id: Uuid) -> Result<()>;
    fn update_vehicle_odometer(&mut self, id: Uuid, odometer_km: u32) -> Result<()>;
    fn update_vehicle_service_record(
        &mut self,
        id: Uuid,
        date: NaiveDate,
        odometer_km: u32,
    ) -> Result<()>;

    fn insert_fuel_entry(&mut self, entry: FuelEntry) -> Result<Uuid>;
    fn fuel_entry(&self, id: Uuid) -> Result<FuelEntry>;
    /// Entries for `vehicle_id`, newest first by date.
    fn list_fuel_entries(&self, vehicle_id: Uuid) -> Result<Vec<FuelEntry>>;
    /// Full-tank entries for `vehicle_id` with an odometer strictly below
    /// `max_odometer_km`, ordered by odometer descending.
    fn list_capacity_fill_entries(
        &self,
        vehicle_id: Uuid,
        max_odometer_km: u32,
    ) -> Result<Vec<FuelEntry>>;
    fn update_fuel_entry(&mut self, entry: FuelEntry) -> Result<()>;
    fn delete_fuel_entry(&mut self, id: Uuid) -> Result<()>;
}
