use tracing::{info, warn};

use crate::errors::{GarageError, Result};
use crate::garage::{Garage, CURRENT_SCHEMA_VERSION};
use crate::storage::StorageBackend;

/// Facade that coordinates the open garage, persistence, and backups.
pub struct GarageManager {
    current: Option<Garage>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl GarageManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current(&self) -> Result<&Garage> {
        self.current.as_ref().ok_or(GarageError::NotLoaded)
    }

    pub fn current_mut(&mut self) -> Result<&mut Garage> {
        self.current.as_mut().ok_or(GarageError::NotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// Starts a fresh, unsaved garage and makes it current.
    pub fn create(&mut self, name: &str) -> &mut Garage {
        self.current_name = Some(name.to_string());
        self.current.insert(Garage::new(name))
    }

    /// Opens a stored garage; returns integrity warnings found while loading.
    pub fn load(&mut self, name: &str) -> Result<Vec<String>> {
        let garage = self.storage.load(name)?;
        if garage.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(GarageError::Storage(format!(
                "garage `{}` uses schema v{} but this build supports up to v{}",
                name, garage.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let warnings = garage.warnings();
        for warning in &warnings {
            warn!(garage = name, "{warning}");
        }
        info!(garage = name, vehicles = garage.vehicles.len(), "garage loaded");
        self.current = Some(garage);
        self.current_name = Some(name.to_string());
        Ok(warnings)
    }

    pub fn save(&mut self) -> Result<()> {
        let name = self.current_name.clone().ok_or(GarageError::NotLoaded)?;
        let garage = self.current.as_mut().ok_or(GarageError::NotLoaded)?;
        garage.touch();
        self.storage.save(garage, &name)?;
        info!(garage = %name, "garage saved");
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let name = self.current_name.as_deref().ok_or(GarageError::NotLoaded)?;
        self.storage.backup(self.current()?, name, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        let name = self.current_name.as_deref().ok_or(GarageError::NotLoaded)?;
        self.storage.list_backups(name)
    }

    /// Replaces the current garage with the contents of `backup_name`.
    pub fn restore(&mut self, backup_name: &str) -> Result<()> {
        let name = self.current_name.clone().ok_or(GarageError::NotLoaded)?;
        let garage = self.storage.restore(&name, backup_name)?;
        info!(garage = %name, backup = backup_name, "garage restored");
        self.current = Some(garage);
        Ok(())
    }
}
