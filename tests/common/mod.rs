#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use fuel_core::{
    clock::FixedClock, config::ConfigManager, core::GarageManager, garage::ServiceInterval,
    session::Session, storage::JsonStorage, VehicleInput,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (GarageManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let manager = GarageManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Clock pinned to 2024-06-01 09:00 UTC.
pub fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
}

pub fn session() -> Session {
    let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    Session::new(Uuid::new_v4(), "tester@example.com", "token", expiry)
}

pub fn corolla(current: u32, last_service: u32, last_service_date: NaiveDate) -> VehicleInput {
    VehicleInput {
        brand: "Toyota".into(),
        model: "Corolla".into(),
        year: 2019,
        service_interval: ServiceInterval::new(10_000, 12),
        current_odometer_km: current,
        last_service_odometer_km: last_service,
        last_service_date,
    }
}
