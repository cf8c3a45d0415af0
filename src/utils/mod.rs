pub mod build_info;
pub mod paths;
pub mod persistence;

use std::{fs, io, path::Path, sync::Once};

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();
const DEFAULT_LOG_FILTER: &str = "fuel_core=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// A valid `RUST_LOG` replaces the `fuel_core=info` default entirely.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(log_filter(directives.as_deref()))
            .with_writer(io::stderr)
            .try_init();
    });
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
