//! Validated CRUD helpers for vehicles.

use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::garage::{GarageRepository, ServiceInterval, Vehicle};

use super::{owned_vehicle, ServiceContext, ServiceError, ServiceResult};

const MIN_MODEL_YEAR: i32 = 1900;

/// Fields supplied when registering a vehicle.
#[derive(Debug, Clone)]
pub struct VehicleInput {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub service_interval: ServiceInterval,
    pub current_odometer_km: u32,
    pub last_service_odometer_km: u32,
    pub last_service_date: NaiveDate,
}

pub struct VehicleService;

impl VehicleService {
    /// Registers a vehicle for the session user and returns it.
    pub fn add<R>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        input: VehicleInput,
    ) -> ServiceResult<Vehicle>
    where
        R: GarageRepository + ?Sized,
    {
        let owner_id = ctx.authorize()?;
        Self::validate(ctx, &input)?;
        let vehicle = Vehicle::new(
            owner_id,
            input.brand.trim(),
            input.model.trim(),
            input.year,
            input.last_service_date,
        )
        .with_odometer(input.current_odometer_km, input.last_service_odometer_km)
        .with_interval(input.service_interval);
        repo.insert_vehicle(vehicle.clone())?;
        info!(vehicle = %vehicle.id, name = %vehicle.display_name(), "vehicle added");
        Ok(vehicle)
    }

    /// The session user's vehicles, newest first.
    pub fn list_for_owner<R>(repo: &R, ctx: &ServiceContext<'_>) -> ServiceResult<Vec<Vehicle>>
    where
        R: GarageRepository + ?Sized,
    {
        let owner_id = ctx.authorize()?;
        Ok(repo.list_vehicles(owner_id)?)
    }

    pub fn get<R>(repo: &R, ctx: &ServiceContext<'_>, id: Uuid) -> ServiceResult<Vehicle>
    where
        R: GarageRepository + ?Sized,
    {
        owned_vehicle(&*repo, ctx, id)
    }

    /// Applies `mutator` to the vehicle; identity and ownership cannot be changed.
    pub fn update<R, F>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        id: Uuid,
        mutator: F,
    ) -> ServiceResult<Vehicle>
    where
        R: GarageRepository + ?Sized,
        F: FnOnce(&mut Vehicle),
    {
        let original = owned_vehicle(&*repo, ctx, id)?;
        let mut vehicle = original.clone();
        mutator(&mut vehicle);
        vehicle.id = original.id;
        vehicle.owner_id = original.owner_id;
        vehicle.created_at = original.created_at;
        Self::validate_interval(&vehicle.service_interval)?;
        repo.update_vehicle(vehicle.clone())?;
        Ok(vehicle)
    }

    /// Deletes the vehicle and every fuel entry recorded for it.
    pub fn delete<R>(repo: &mut R, ctx: &ServiceContext<'_>, id: Uuid) -> ServiceResult<()>
    where
        R: GarageRepository + ?Sized,
    {
        owned_vehicle(&*repo, ctx, id)?;
        repo.delete_vehicle(id)?;
        info!(vehicle = %id, "vehicle deleted");
        Ok(())
    }

    /// Sets the current odometer reading directly, e.g. to correct a typo.
    pub fn update_odometer<R>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        id: Uuid,
        odometer_km: u32,
    ) -> ServiceResult<()>
    where
        R: GarageRepository + ?Sized,
    {
        let vehicle = owned_vehicle(&*repo, ctx, id)?;
        if odometer_km < vehicle.current_odometer_km {
            warn!(
                vehicle = %id,
                from = vehicle.current_odometer_km,
                to = odometer_km,
                "odometer moved backwards"
            );
        }
        repo.update_vehicle_odometer(id, odometer_km)?;
        Ok(())
    }

    fn validate(ctx: &ServiceContext<'_>, input: &VehicleInput) -> ServiceResult<()> {
        if input.brand.trim().is_empty() || input.model.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "Brand and model are required".into(),
            ));
        }
        let current_year = ctx.clock.today().year();
        if input.year < MIN_MODEL_YEAR || input.year > current_year {
            return Err(ServiceError::Invalid(format!(
                "Model year must be between {MIN_MODEL_YEAR} and {current_year}"
            )));
        }
        Self::validate_interval(&input.service_interval)
    }

    fn validate_interval(interval: &ServiceInterval) -> ServiceResult<()> {
        if interval.distance_km == 0 || interval.months == 0 {
            Err(ServiceError::Invalid(
                "Service interval must be greater than zero".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::test_support::{clock, date, session};
    use crate::errors::GarageError;
    use crate::garage::Garage;

    fn input() -> VehicleInput {
        VehicleInput {
            brand: " Mazda ".into(),
            model: "3".into(),
            year: 2016,
            service_interval: ServiceInterval::new(15_000, 12),
            current_odometer_km: 82_000,
            last_service_odometer_km: 75_000,
            last_service_date: date(2023, 11, 20),
        }
    }

    #[test]
    fn add_assigns_session_owner() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");

        let vehicle = VehicleService::add(&mut garage, &ctx, input()).unwrap();
        assert_eq!(vehicle.owner_id, session.user_id);
        assert_eq!(vehicle.brand, "Mazda");
        assert_eq!(vehicle.current_odometer_km, 82_000);
    }

    #[test]
    fn future_model_year_is_rejected() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");
        let mut bad = input();
        bad.year = 2031;

        let err = VehicleService::add(&mut garage, &ctx, bad).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("Model year")));
    }

    #[test]
    fn blank_brand_or_model_is_rejected() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");

        let mut blank_brand = input();
        blank_brand.brand = "  ".into();
        let err = VehicleService::add(&mut garage, &ctx, blank_brand).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("Brand and model")));

        let mut blank_model = input();
        blank_model.model = String::new();
        assert!(matches!(
            VehicleService::add(&mut garage, &ctx, blank_model),
            Err(ServiceError::Invalid(_))
        ));
        assert!(garage.vehicles.is_empty());
    }

    #[test]
    fn model_year_starts_at_1900() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");

        let mut too_old = input();
        too_old.year = 1899;
        let err = VehicleService::add(&mut garage, &ctx, too_old).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("between 1900")));

        let mut oldest = input();
        oldest.year = 1900;
        assert!(VehicleService::add(&mut garage, &ctx, oldest).is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");
        let mut bad = input();
        bad.service_interval = ServiceInterval::new(0, 12);

        assert!(matches!(
            VehicleService::add(&mut garage, &ctx, bad),
            Err(ServiceError::Invalid(_))
        ));
    }

    #[test]
    fn other_users_vehicles_are_hidden() {
        let (owner, clock) = (session(), clock());
        let stranger = session();
        let mut garage = Garage::new("Test");
        let vehicle =
            VehicleService::add(&mut garage, &ServiceContext::new(&owner, &clock), input()).unwrap();

        let ctx = ServiceContext::new(&stranger, &clock);
        assert!(VehicleService::list_for_owner(&garage, &ctx)
            .unwrap()
            .is_empty());
        assert!(matches!(
            VehicleService::get(&garage, &ctx, vehicle.id),
            Err(ServiceError::Garage(GarageError::VehicleNotFound(_)))
        ));
    }

    #[test]
    fn update_keeps_identity() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");
        let vehicle = VehicleService::add(&mut garage, &ctx, input()).unwrap();

        let updated = VehicleService::update(&mut garage, &ctx, vehicle.id, |v| {
            v.id = Uuid::new_v4();
            v.model = "CX-3".into();
        })
        .unwrap();
        assert_eq!(updated.id, vehicle.id);
        assert_eq!(VehicleService::get(&garage, &ctx, vehicle.id).unwrap().model, "CX-3");
    }

    #[test]
    fn update_odometer_allows_correction() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Test");
        let vehicle = VehicleService::add(&mut garage, &ctx, input()).unwrap();

        VehicleService::update_odometer(&mut garage, &ctx, vehicle.id, 81_500).unwrap();
        let stored = VehicleService::get(&garage, &ctx, vehicle.id).unwrap();
        assert_eq!(stored.current_odometer_km, 81_500);
    }

    #[test]
    fn expired_session_cannot_add() {
        let clock = clock();
        let mut expired = session();
        expired.expires_at = clock.0;
        let ctx = ServiceContext::new(&expired, &clock);
        let mut garage = Garage::new("Test");

        assert!(matches!(
            VehicleService::add(&mut garage, &ctx, input()),
            Err(ServiceError::Garage(GarageError::SessionExpired))
        ));
    }
}
