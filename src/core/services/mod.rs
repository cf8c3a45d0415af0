pub mod fuel_service;
pub mod maintenance_service;
pub mod vehicle_service;

pub use fuel_service::{FuelEntryInput, FuelService};
pub use maintenance_service::MaintenanceService;
pub use vehicle_service::{VehicleInput, VehicleService};

use uuid::Uuid;

use crate::core::{clock::Clock, session::Session};
use crate::errors::GarageError;
use crate::garage::{GarageRepository, Vehicle};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Garage(#[from] GarageError),
    #[error("{0}")]
    Invalid(String),
}

/// Caller identity and time source threaded through every service call.
pub struct ServiceContext<'a> {
    pub session: &'a Session,
    pub clock: &'a dyn Clock,
}

impl<'a> ServiceContext<'a> {
    pub fn new(session: &'a Session, clock: &'a dyn Clock) -> Self {
        Self { session, clock }
    }

    /// Fails once the session has expired, otherwise yields the caller's user id.
    pub fn authorize(&self) -> ServiceResult<Uuid> {
        self.session.ensure_active(self.clock.now())?;
        Ok(self.session.user_id)
    }
}

/// Loads a vehicle that belongs to the session user.
///
/// Vehicles owned by someone else are reported as missing.
pub(crate) fn owned_vehicle<R>(
    repo: &R,
    ctx: &ServiceContext<'_>,
    vehicle_id: Uuid,
) -> ServiceResult<Vehicle>
where
    R: GarageRepository + ?Sized,
{
    let user_id = ctx.authorize()?;
    let vehicle = repo.vehicle(vehicle_id)?;
    if vehicle.owner_id != user_id {
        return Err(GarageError::VehicleNotFound(vehicle_id).into());
    }
    Ok(vehicle)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::core::clock::FixedClock;
    use crate::core::session::Session;

    pub fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
    }

    pub fn session() -> Session {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        Session::new(uuid::Uuid::new_v4(), "driver@example.com", "token", expiry)
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
