//! Fuel Core tracks vehicles, fuel fill-ups and oil-change schedules:
//! consumption per full tank, rolling averages and service due dates.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod garage;
pub mod storage;
pub mod utils;

pub use crate::core::services::{
    FuelEntryInput, FuelService, MaintenanceService, ServiceContext, ServiceError, ServiceResult,
    VehicleInput, VehicleService,
};
pub use crate::core::{clock, efficiency, maintenance, session, GarageManager};
pub use errors::{GarageError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fuel Core tracing initialized.");
    });
}
