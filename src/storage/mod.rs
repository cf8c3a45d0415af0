pub mod json_backend;

use crate::{errors::GarageError, garage::Garage};

pub type Result<T> = std::result::Result<T, GarageError>;

/// Abstraction over persistence backends capable of storing garages and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, garage: &Garage, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Garage>;
    fn list_garages(&self) -> Result<Vec<String>>;
    /// Backup file names for `name`, newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, garage: &Garage, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Garage>;
}

pub use json_backend::{JsonStorage, StoreState};
