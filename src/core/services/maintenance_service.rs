use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::maintenance::{evaluate_status, MaintenanceStatus};
use crate::garage::{GarageRepository, Vehicle};

use super::{owned_vehicle, ServiceContext, ServiceError, ServiceResult};

/// Oil-change status lookups and service recording.
pub struct MaintenanceService;

impl MaintenanceService {
    /// Current maintenance status for one vehicle, evaluated at the context clock.
    pub fn status<R>(
        repo: &R,
        ctx: &ServiceContext<'_>,
        vehicle_id: Uuid,
    ) -> ServiceResult<MaintenanceStatus>
    where
        R: GarageRepository + ?Sized,
    {
        let vehicle = owned_vehicle(repo, ctx, vehicle_id)?;
        Ok(evaluate_status(&vehicle, ctx.clock.now()))
    }

    /// Status for every vehicle of the session user, overdue vehicles first.
    pub fn fleet_status<R>(
        repo: &R,
        ctx: &ServiceContext<'_>,
    ) -> ServiceResult<Vec<(Vehicle, MaintenanceStatus)>>
    where
        R: GarageRepository + ?Sized,
    {
        let owner_id = ctx.authorize()?;
        let now = ctx.clock.now();
        let mut rows: Vec<(Vehicle, MaintenanceStatus)> = repo
            .list_vehicles(owner_id)?
            .into_iter()
            .map(|vehicle| {
                let status = evaluate_status(&vehicle, now);
                (vehicle, status)
            })
            .collect();
        rows.sort_by_key(|(_, status)| (!status.is_overdue(), status.days_remaining));
        Ok(rows)
    }

    /// Records an oil change: last-service date, last-service odometer and the
    /// current odometer all take the supplied values.
    ///
    /// A reading below the vehicle's current odometer is rejected; an equal
    /// reading is accepted.
    pub fn record_service<R>(
        repo: &mut R,
        ctx: &ServiceContext<'_>,
        vehicle_id: Uuid,
        date: NaiveDate,
        odometer_km: u32,
    ) -> ServiceResult<Vehicle>
    where
        R: GarageRepository + ?Sized,
    {
        let vehicle = owned_vehicle(&*repo, ctx, vehicle_id)?;
        if odometer_km < vehicle.current_odometer_km {
            warn!(
                vehicle = %vehicle_id,
                current = vehicle.current_odometer_km,
                supplied = odometer_km,
                "rejected service record below current odometer"
            );
            return Err(ServiceError::Invalid(format!(
                "Odometer reading {odometer_km} km is below the current reading of {} km",
                vehicle.current_odometer_km
            )));
        }
        repo.update_vehicle_service_record(vehicle_id, date, odometer_km)?;
        info!(vehicle = %vehicle_id, %date, odometer = odometer_km, "service recorded");
        Ok(repo.vehicle(vehicle_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::test_support::{clock, date, session};
    use crate::core::services::{VehicleInput, VehicleService};
    use crate::garage::{Garage, ServiceInterval};

    fn add_vehicle(
        garage: &mut Garage,
        ctx: &ServiceContext<'_>,
        current: u32,
        last_service: u32,
        last_date: NaiveDate,
    ) -> Uuid {
        VehicleService::add(
            garage,
            ctx,
            VehicleInput {
                brand: "Ford".into(),
                model: "Focus".into(),
                year: 2014,
                service_interval: ServiceInterval::new(10_000, 12),
                current_odometer_km: current,
                last_service_odometer_km: last_service,
                last_service_date: last_date,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn status_reports_remaining_distance() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Service");
        let id = add_vehicle(&mut garage, &ctx, 16_500, 10_000, date(2024, 1, 1));

        let status = MaintenanceService::status(&garage, &ctx, id).unwrap();
        assert_eq!(status.distance_remaining_km, 3_500);
        assert!(!status.overdue_by_distance);
        assert_eq!(status.next_service_date, date(2025, 1, 1));
    }

    #[test]
    fn record_service_resets_counters() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Service");
        let id = add_vehicle(&mut garage, &ctx, 21_000, 10_000, date(2023, 1, 1));

        let before = MaintenanceService::status(&garage, &ctx, id).unwrap();
        assert!(before.overdue_by_distance && before.overdue_by_time);

        let vehicle =
            MaintenanceService::record_service(&mut garage, &ctx, id, date(2024, 5, 30), 21_000)
                .unwrap();
        assert_eq!(vehicle.last_service_odometer_km, 21_000);
        assert_eq!(vehicle.current_odometer_km, 21_000);

        let after = MaintenanceService::status(&garage, &ctx, id).unwrap();
        assert_eq!(after.distance_remaining_km, 10_000);
        assert!(!after.is_overdue());
    }

    #[test]
    fn record_service_rejects_lower_odometer() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Service");
        let id = add_vehicle(&mut garage, &ctx, 21_000, 10_000, date(2023, 1, 1));

        let err =
            MaintenanceService::record_service(&mut garage, &ctx, id, date(2024, 5, 30), 20_999)
                .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
        assert_eq!(garage.vehicle(id).unwrap().last_service_odometer_km, 10_000);
    }

    #[test]
    fn fleet_status_lists_overdue_first() {
        let (session, clock) = (session(), clock());
        let ctx = ServiceContext::new(&session, &clock);
        let mut garage = Garage::new("Service");
        let fine = add_vehicle(&mut garage, &ctx, 12_000, 10_000, date(2024, 3, 1));
        let overdue = add_vehicle(&mut garage, &ctx, 25_000, 10_000, date(2024, 3, 1));

        let rows = MaintenanceService::fleet_status(&garage, &ctx).unwrap();
        let ids: Vec<Uuid> = rows.iter().map(|(vehicle, _)| vehicle.id).collect();
        assert_eq!(ids, vec![overdue, fine]);
    }
}
