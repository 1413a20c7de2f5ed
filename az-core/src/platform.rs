//! OS-specific directories for config and log files.

use std::path::PathBuf;

use crate::constants::APP_NAME;
use crate::error::{AzError, AzResult};

/// Application data directory; log files live under `logs/` here.
///
/// - Windows: `%APPDATA%/Arifzyn`
/// - macOS: `~/Library/Application Support/Arifzyn`
/// - Linux: `~/.local/share/Arifzyn`
pub fn data_dir() -> AzResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| AzError::Config("could not determine data directory".into()))?;
    Ok(base.join(APP_NAME))
}

/// Configuration directory holding `config.toml`.
pub fn config_dir() -> AzResult<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| AzError::Config("could not determine config directory".into()))?;
    Ok(base.join(APP_NAME))
}
