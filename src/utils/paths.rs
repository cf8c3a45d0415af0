use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".fuel_core";
const HOME_ENV: &str = "FUEL_CORE_HOME";
const GARAGE_DIR: &str = "garages";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";
const STATE_FILE: &str = "state.json";

/// Returns the application data directory, defaulting to `~/.fuel_core`.
///
/// `FUEL_CORE_HOME` overrides the location.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Uses `base` when supplied, otherwise [`app_data_dir`].
pub fn resolve_base(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(app_data_dir)
}

pub fn garages_dir_in(base: &Path) -> PathBuf {
    base.join(GARAGE_DIR)
}

pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Shared state file (last opened garage, active session).
pub fn state_file_in(base: &Path) -> PathBuf {
    base.join(STATE_FILE)
}
