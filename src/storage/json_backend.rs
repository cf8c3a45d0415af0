use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::session::Session,
    errors::GarageError,
    garage::Garage,
    utils::{
        ensure_dir, paths,
        persistence::{load_garage_from_file, save_garage_to_file, write_atomic},
    },
};

use super::{Result, StorageBackend};

const GARAGE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// Small amount of cross-run state kept next to the garages.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub last_garage: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
}

/// Stores each garage as a pretty-printed JSON file with rotating backups.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    garages_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = paths::resolve_base(root);
        ensure_dir(&root)?;
        let garages_dir = paths::garages_dir_in(&root);
        let backups_dir = paths::backups_dir_in(&root);
        ensure_dir(&garages_dir)?;
        ensure_dir(&backups_dir)?;
        let state_file = paths::state_file_in(&root);
        Ok(Self {
            root,
            garages_dir,
            backups_dir,
            state_file,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn garage_path(&self, name: &str) -> PathBuf {
        self.garages_dir
            .join(format!("{}.{}", canonical_name(name), GARAGE_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    pub fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    pub fn write_state(&self, state: &StoreState) -> Result<()> {
        let data = serde_json::to_string_pretty(state)?;
        write_atomic(&self.state_file, &data)
    }

    pub fn record_last_garage(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_garage = name.map(canonical_name);
        self.write_state(&state)
    }

    /// Picks a fresh file name in the garage's backup dir, suffixing a counter on collision.
    fn next_backup_path(&self, name: &str, note: Option<&str>) -> Result<(PathBuf, String)> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let mut file_name = format!("{}.{}", file_stem, GARAGE_EXTENSION);
        let mut counter = 1;
        while dir.join(&file_name).exists() {
            counter += 1;
            file_name = format!("{}_{}.{}", file_stem, counter, GARAGE_EXTENSION);
        }
        Ok((dir.join(&file_name), file_name))
    }

    fn write_backup_file(&self, garage: &Garage, name: &str, note: Option<&str>) -> Result<String> {
        let (path, file_name) = self.next_backup_path(name, note)?;
        save_garage_to_file(garage, &path)?;
        self.prune_backups(name)?;
        debug!(garage = name, backup = %file_name, "backup written");
        Ok(file_name)
    }

    /// Copies the on-disk file as-is so a damaged garage can still be overwritten.
    fn backup_existing_file(&self, name: &str, source: &Path) -> Result<()> {
        if !source.exists() {
            return Ok(());
        }
        let (path, file_name) = self.next_backup_path(name, None)?;
        fs::copy(source, &path)?;
        self.prune_backups(name)?;
        debug!(garage = name, backup = %file_name, "previous file backed up");
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for stale in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(name, stale));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, garage: &Garage, name: &str) -> Result<()> {
        let path = self.garage_path(name);
        self.backup_existing_file(name, &path)?;
        save_garage_to_file(garage, &path)
    }

    fn load(&self, name: &str) -> Result<Garage> {
        let path = self.garage_path(name);
        if !path.exists() {
            return Err(GarageError::Storage(format!("garage `{}` not found", name)));
        }
        load_garage_from_file(&path)
    }

    fn list_garages(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.garages_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(GARAGE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(GARAGE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn backup(&self, garage: &Garage, name: &str, note: Option<&str>) -> Result<String> {
        self.write_backup_file(garage, name, note)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Garage> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(GarageError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let garage = load_garage_from_file(&backup_path)?;
        save_garage_to_file(&garage, &self.garage_path(name))?;
        Ok(garage)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "garage".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts the `YYYYMMDD_HHMMSSmmm` stamp following the canonical garage name.
fn parse_backup_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(&format!(".{}", GARAGE_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).find_map(|pair| {
        if !(is_digits(pair[0], 8) && is_digits(pair[1], 9)) {
            return None;
        }
        let (time, millis) = pair[1].split_at(6);
        let raw = format!("{}{}", pair[0], time);
        let naive = NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S").ok()?;
        let millis: i64 = millis.parse().ok()?;
        Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
