//! Fuel entry bookkeeping: consumption on insert, odometer advance, averages.

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::efficiency::{self, compute_consumption, select_prior_entry};
use crate::garage::{FuelEntry, GarageRepository};

use super::{owned_vehicle, ServiceContext, ServiceError, ServiceResult};

/// Fields supplied when recording a fill-up.
#[derive(Debug, Clone)]
pub struct FuelEntryInput {
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub station_name: String,
    pub odometer_km: u32,
    pub litres: f64,
    pub total_price: f64,
    pub price_per_litre: Option<f64>,
    pub is_full_tank: bool,
}

pub struct FuelService;

impl FuelService {
    /// Records a fill-up and returns the stored entry.
    ///
    /// The previous full tank is looked up before the insert so the new
    /// entry can never be its own predecessor. After a successful insert the
    /// vehicle odometer is advanced when the new reading is higher.
    pub fn add_entry<R>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        input: FuelEntryInput,
    ) -> ServiceResult<FuelEntry>
    where
        R: GarageRepository + ?Sized,
    {
        let mut vehicle = owned_vehicle(&*repo, ctx, input.vehicle_id)?;
        Self::validate(&input)?;

        let mut entry = FuelEntry::new(
            input.vehicle_id,
            input.date,
            input.odometer_km,
            input.litres,
            input.total_price,
            input.is_full_tank,
        )
        .with_station(input.station_name.trim());
        entry.price_per_litre =
            efficiency::price_per_litre(input.total_price, input.litres, input.price_per_litre);

        if entry.is_full_tank {
            let candidates =
                repo.list_capacity_fill_entries(input.vehicle_id, input.odometer_km)?;
            let prior = select_prior_entry(&candidates, input.odometer_km);
            entry.consumption_l_per_100km = compute_consumption(&entry, prior);
            debug!(
                vehicle = %vehicle.id,
                prior = ?prior.map(|p| p.odometer_km),
                consumption = ?entry.consumption_l_per_100km,
                "consumption computed"
            );
        }

        repo.insert_fuel_entry(entry.clone())?;
        if vehicle.advance_odometer(entry.odometer_km) {
            repo.update_vehicle_odometer(vehicle.id, vehicle.current_odometer_km)?;
        }
        info!(
            vehicle = %vehicle.id,
            entry = %entry.id,
            odometer = entry.odometer_km,
            litres = entry.litres,
            "fuel entry recorded"
        );
        Ok(entry)
    }

    /// Entries for a vehicle, newest first.
    pub fn entries_for_vehicle<R>(
        repo: &R,
        ctx: &ServiceContext<'_>,
        vehicle_id: Uuid,
    ) -> ServiceResult<Vec<FuelEntry>>
    where
        R: GarageRepository + ?Sized,
    {
        owned_vehicle(&*repo, ctx, vehicle_id)?;
        Ok(repo.list_fuel_entries(vehicle_id)?)
    }

    /// Deletes an entry. Consumption stored on later entries is left untouched.
    pub fn delete_entry<R>(repo: &mut R, ctx: &ServiceContext<'_>, id: Uuid) -> ServiceResult<()>
    where
        R: GarageRepository + ?Sized,
    {
        let entry = repo.fuel_entry(id)?;
        owned_vehicle(&*repo, ctx, entry.vehicle_id)?;
        repo.delete_fuel_entry(id)?;
        info!(entry = %id, vehicle = %entry.vehicle_id, "fuel entry deleted");
        Ok(())
    }

    /// Edits an entry via `mutator`. Identity, owning vehicle and the stored
    /// consumption value are kept as they were.
    pub fn update_entry<R, F>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        id: Uuid,
        mutator: F,
    ) -> ServiceResult<FuelEntry>
    where
        R: GarageRepository + ?Sized,
        F: FnOnce(&mut FuelEntry),
    {
        let original = repo.fuel_entry(id)?;
        owned_vehicle(&*repo, ctx, original.vehicle_id)?;
        let mut entry = original.clone();
        mutator(&mut entry);
        entry.id = original.id;
        entry.vehicle_id = original.vehicle_id;
        entry.created_at = original.created_at;
        entry.consumption_l_per_100km = original.consumption_l_per_100km;
        if entry.litres <= 0.0 || !entry.litres.is_finite() {
            warn!(entry = %id, "rejected update with non-positive litres");
            return Err(ServiceError::Invalid("Litres must be greater than zero".into()));
        }
        repo.update_fuel_entry(entry.clone())?;
        Ok(entry)
    }

    /// Average consumption over the `window` most recent entries that have one.
    pub fn average_consumption<R>(
        repo: &R,
        ctx: &ServiceContext<'_>,
        vehicle_id: Uuid,
        window: usize,
    ) -> ServiceResult<Option<f64>>
    where
        R: GarageRepository + ?Sized,
    {
        let entries = Self::entries_for_vehicle(repo, ctx, vehicle_id)?;
        Ok(efficiency::average_consumption(&entries, window))
    }

    fn validate(input: &FuelEntryInput) -> ServiceResult<()> {
        if input.litres <= 0.0 || !input.litres.is_finite() {
            warn!(vehicle = %input.vehicle_id, litres = input.litres, "rejected fuel entry");
            return Err(ServiceError::Invalid("Litres must be greater than zero".into()));
        }
        if input.total_price < 0.0 || !input.total_price.is_finite() {
            warn!(vehicle = %input.vehicle_id, total = input.total_price, "rejected fuel entry");
            return Err(ServiceError::Invalid("Total price cannot be negative".into()));
        }
        Ok(())
    }
}
