//! Garage domain models, persistence-friendly types, and the record store contract.

pub mod calendar;
#[allow(clippy::module_inception)]
pub mod garage;
pub mod fuel_entry;
pub mod repository;
pub mod vehicle;

pub use fuel_entry::FuelEntry;
pub use garage::{Garage, CURRENT_SCHEMA_VERSION};
pub use repository::GarageRepository;
pub use vehicle::{ServiceInterval, Vehicle};
