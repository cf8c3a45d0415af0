mod common;

use std::fs;

use common::{clock, corolla, date, session, setup_test_env, temp_base};
use fuel_core::{
    config::Config,
    garage::{Garage, GarageRepository},
    storage::{JsonStorage, StorageBackend},
    utils::persistence::tmp_path,
    FuelEntryInput, FuelService, GarageError, ServiceContext, VehicleService,
};

fn populated_garage() -> Garage {
    let (session, clock) = (session(), clock());
    let ctx = ServiceContext::new(&session, &clock);
    let mut garage = Garage::new("Household");
    let vehicle =
        VehicleService::add(&mut garage, &ctx, corolla(10_000, 10_000, date(2024, 1, 5))).unwrap();
    for (day, odometer, litres) in [(1, 10_000, 40.0), (15, 10_500, 45.0)] {
        FuelService::add_entry(
            &mut garage,
            &ctx,
            FuelEntryInput {
                vehicle_id: vehicle.id,
                date: date(2024, 5, day),
                station_name: "BP".into(),
                odometer_km: odometer,
                litres,
                total_price: 80.0,
                price_per_litre: Some(1.899),
                is_full_tank: true,
            },
        )
        .unwrap();
    }
    garage
}

#[test]
fn saved_garage_round_trips_derived_values() {
    let (mut manager, _config, _base) = setup_test_env();
    *manager.create("household") = populated_garage();
    manager.save().expect("save garage");

    manager.load("household").expect("reload garage");
    let garage = manager.current().unwrap();
    let vehicle_id = garage.vehicles[0].id;
    let entries = garage.list_fuel_entries(vehicle_id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].price_per_litre, Some(1.899));
    assert!(entries[0].consumption_l_per_100km.is_some());
    assert_eq!(garage.vehicle(vehicle_id).unwrap().current_odometer_km, 10_500);
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base), Some(2)).unwrap();
    storage.save(&populated_garage(), "reliable").expect("initial save");
    let path = storage.garage_path("reliable");
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the staging path makes the temp file creation fail.
    let staging = tmp_path(&path);
    fs::create_dir_all(&staging).unwrap();

    let result = storage.save(&Garage::new("Replacement"), "reliable");
    assert!(result.is_err(), "expected save to fail when the temp path is a directory");
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(
        !storage.list_backups("reliable").unwrap().is_empty(),
        "backup should be taken before the write"
    );

    fs::remove_dir_all(&staging).unwrap();
}

#[test]
fn repeated_saves_keep_retention_window() {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base), Some(2)).unwrap();
    let garage = Garage::new("Busy");
    for _ in 0..5 {
        storage.save(&garage, "busy").unwrap();
    }
    assert_eq!(storage.list_backups("busy").unwrap().len(), 2);
}

#[test]
fn corrupt_file_reports_serialization_error() {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base), None).unwrap();
    fs::write(storage.garage_path("broken"), "{ not json").unwrap();
    assert!(matches!(storage.load("broken"), Err(GarageError::Serde(_))));
}

#[test]
fn save_overwrites_corrupt_file_and_keeps_raw_copy() {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base), None).unwrap();
    let path = storage.garage_path("home");
    fs::write(&path, "{ not json").unwrap();

    storage
        .save(&Garage::new("Home"), "home")
        .expect("save over a damaged file");
    assert_eq!(storage.load("home").unwrap().name, "Home");

    let backups = storage.list_backups("home").unwrap();
    assert_eq!(backups.len(), 1);
    let copied = fs::read_to_string(storage.backup_path("home", &backups[0])).unwrap();
    assert_eq!(copied, "{ not json");
}

#[test]
fn orphaned_entries_surface_as_load_warnings() {
    let (mut manager, _config, _base) = setup_test_env();
    let mut garage = populated_garage();
    garage.vehicles.clear();
    *manager.create("orphans") = garage;
    manager.save().unwrap();

    let warnings = manager.load("orphans").unwrap();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("unknown vehicle"));
}

#[test]
fn config_defaults_and_updates_persist() {
    let (_manager, config_manager, _base) = setup_test_env();
    let mut config = config_manager.load().unwrap();
    assert_eq!(config, Config::default());

    config.average_window = 3;
    config.currency = "GBP".into();
    config_manager.save(&config).unwrap();
    assert_eq!(config_manager.load().unwrap().currency, "GBP");
}
