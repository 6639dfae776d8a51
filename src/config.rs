// src/config.rs

//! Configuration loading utilities.
//!
//! Resolves the config file path (flag, environment, or working directory),
//! loads it with defaults on failure, and validates the result.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "DOCWARD_CONFIG";

/// Default config file name in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "docward.toml";

/// Resolve the config file path: explicit flag > environment > default.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load and validate configuration, falling back to defaults when the file
/// is absent or unreadable.
pub fn load(explicit: Option<&Path>) -> Result<ClientConfig> {
    let path = config_path(explicit);
    let config = ClientConfig::load_or_default(&path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("invalid config {}: {e}", path.display())))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = config_path(Some(Path::new("/tmp/custom.toml")));
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load(Some(Path::new("/nonexistent/docward.toml"))).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }
}
