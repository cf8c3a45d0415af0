mod common;

use common::{clock, corolla, date, session};
use fuel_core::{
    garage::{Garage, GarageRepository},
    FuelEntryInput, FuelService, MaintenanceService, ServiceContext, ServiceError, VehicleService,
};
use uuid::Uuid;

fn fill(vehicle_id: Uuid, day: u32, odometer_km: u32, litres: f64, full: bool) -> FuelEntryInput {
    FuelEntryInput {
        vehicle_id,
        date: date(2024, 5, day),
        station_name: "Galp".into(),
        odometer_km,
        litres,
        total_price: litres * 1.75,
        price_per_litre: None,
        is_full_tank: full,
    }
}

#[test]
fn consecutive_full_tanks_yield_consumption() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle = VehicleService::add(&mut garage, &ctx, corolla(9_800, 9_800, date(2024, 1, 10)))
        .expect("add vehicle");

    let first = FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 1, 10_000, 40.0, true))
        .expect("first fill");
    assert_eq!(first.consumption_l_per_100km, None);

    let second = FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 8, 10_500, 45.0, true))
        .expect("second fill");
    let consumption = second.consumption_l_per_100km.expect("consumption");
    assert!((consumption - 9.0).abs() < 1e-9, "{consumption}");
    assert_eq!(garage.vehicle(vehicle.id).unwrap().current_odometer_km, 10_500);
}

#[test]
fn partial_fill_has_no_consumption_and_is_skipped_as_prior() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle = VehicleService::add(&mut garage, &ctx, corolla(0, 0, date(2024, 1, 10))).unwrap();

    FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 1, 10_000, 40.0, true)).unwrap();
    let partial =
        FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 5, 10_300, 20.0, false))
            .unwrap();
    assert_eq!(partial.consumption_l_per_100km, None);

    let full = FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 9, 10_800, 48.0, true))
        .unwrap();
    let consumption = full.consumption_l_per_100km.expect("measured against first full tank");
    assert!((consumption - 6.0).abs() < 1e-9, "{consumption}");
}

#[test]
fn late_entry_for_lower_odometer_does_not_rewind_vehicle() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle = VehicleService::add(&mut garage, &ctx, corolla(0, 0, date(2024, 1, 10))).unwrap();

    FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 10, 12_000, 40.0, true)).unwrap();
    let backfilled =
        FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 2, 11_000, 38.0, true))
            .unwrap();

    assert_eq!(backfilled.consumption_l_per_100km, None);
    assert_eq!(garage.vehicle(vehicle.id).unwrap().current_odometer_km, 12_000);
}

#[test]
fn average_uses_latest_five_measurements() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle = VehicleService::add(&mut garage, &ctx, corolla(0, 0, date(2024, 1, 10))).unwrap();

    // 100 km legs: the first fill has no consumption, later ones use litres directly.
    let litres = [30.0, 10.0, 20.0, 6.0, 6.0, 6.0, 6.0, 6.0];
    for (index, amount) in litres.iter().enumerate() {
        let odometer = 1_000 + index as u32 * 100;
        FuelService::add_entry(
            &mut garage,
            &ctx,
            fill(vehicle.id, index as u32 + 1, odometer, *amount, true),
        )
        .unwrap();
    }

    let average = FuelService::average_consumption(&garage, &ctx, vehicle.id, 5).unwrap();
    assert_eq!(average, Some(6.0));
    let longer = FuelService::average_consumption(&garage, &ctx, vehicle.id, 7).unwrap();
    assert_eq!(longer, Some(8.6));
}

#[test]
fn fuel_entries_raise_distance_towards_service() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle =
        VehicleService::add(&mut garage, &ctx, corolla(12_000, 10_000, date(2024, 3, 1))).unwrap();

    let before = MaintenanceService::status(&garage, &ctx, vehicle.id).unwrap();
    assert_eq!(before.distance_remaining_km, 8_000);

    FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 20, 21_000, 40.0, true)).unwrap();
    let after = MaintenanceService::status(&garage, &ctx, vehicle.id).unwrap();
    assert_eq!(after.distance_remaining_km, -1_000);
    assert!(after.overdue_by_distance);
    assert!(!after.overdue_by_time);

    MaintenanceService::record_service(&mut garage, &ctx, vehicle.id, date(2024, 5, 31), 21_000)
        .unwrap();
    let serviced = MaintenanceService::status(&garage, &ctx, vehicle.id).unwrap();
    assert_eq!(serviced.distance_remaining_km, 10_000);
    assert_eq!(serviced.next_service_date, date(2025, 5, 31));
}

#[test]
fn deleting_vehicle_removes_its_entries() {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Flow");
    let vehicle = VehicleService::add(&mut garage, &ctx, corolla(0, 0, date(2024, 1, 10))).unwrap();
    FuelService::add_entry(&mut garage, &ctx, fill(vehicle.id, 1, 1_000, 40.0, true)).unwrap();

    VehicleService::delete(&mut garage, &ctx, vehicle.id).unwrap();
    assert_eq!(garage.entry_count(), 0);
    assert!(matches!(
        FuelService::entries_for_vehicle(&garage, &ctx, vehicle.id),
        Err(ServiceError::Garage(_))
    ));
}
