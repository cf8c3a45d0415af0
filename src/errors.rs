use thiserror::Error;
use uuid::Uuid;

/// Error type that captures record store and persistence failures.
#[derive(Debug, Error)]
pub enum GarageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(Uuid),
    #[error("Fuel entry not found: {0}")]
    FuelEntryNotFound(Uuid),
    #[error("No garage loaded")]
    NotLoaded,
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Session expired; sign in again")]
    SessionExpired,
}

pub type Result<T> = std::result::Result<T, GarageError>;
