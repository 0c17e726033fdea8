//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.metakb/ and the files inside it.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the MetaKB directory (~/.metakb/)
pub fn metakb_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".metakb"))
}

/// Get the config file path (~/.metakb/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(metakb_dir()?.join("config.json"))
}

/// Get the database file path (~/.metakb/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(metakb_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the MetaKB directory, creating if it doesn't exist
pub fn ensure_metakb_dir() -> AppResult<PathBuf> {
    let path = metakb_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
