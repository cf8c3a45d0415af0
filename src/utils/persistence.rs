use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::GarageError, garage::Garage};

use super::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// Writes the garage to `path` atomically by staging to a temporary file.
pub fn save_garage_to_file(garage: &Garage, path: &Path) -> Result<(), GarageError> {
    let json = serde_json::to_string_pretty(garage)?;
    write_atomic(path, &json)
}

/// Loads a garage snapshot from disk, returning structured errors on failure.
pub fn load_garage_from_file(path: &Path) -> Result<Garage, GarageError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Writes `data` next to `path` and renames it into place.
///
/// A failed write leaves the previous file untouched.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), GarageError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// `garage.json` -> `garage.json.tmp`
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
