use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::efficiency::DEFAULT_AVERAGE_WINDOW,
    errors::GarageError,
    garage::ServiceInterval,
    utils::{ensure_dir, paths, persistence::write_atomic},
};

const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences stored in `<base>/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// How many recent consumption values feed the average.
    #[serde(default = "Config::default_average_window")]
    pub average_window: usize,
    /// Interval applied to vehicles added without an explicit one.
    #[serde(default)]
    pub default_service_interval: ServiceInterval,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Config {
    fn default_average_window() -> usize {
        DEFAULT_AVERAGE_WINDOW
    }

    fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "EUR".into(),
            average_window: DEFAULT_AVERAGE_WINDOW,
            default_service_interval: ServiceInterval::default(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, GarageError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, GarageError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, GarageError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), GarageError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
