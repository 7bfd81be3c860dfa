//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use siglint::{SiglintError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("No catalog artifact: pass --catalog or set `path` in the [catalog] section")]
    MissingCatalog,
}

impl From<ConfigError> for SiglintError {
    fn from(err: ConfigError) -> Self {
        SiglintError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (siglint/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - The rule settings are invalid
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SiglintError> {
    let config = find_config(explicit_path)?;
    config.rules().validate()?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SiglintError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("siglint/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "siglint", "siglint") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SiglintError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// The catalog artifact to use: the explicit flag, else the configured path.
pub fn catalog_path(explicit: Option<&str>, config: &AppConfig) -> Result<PathBuf, SiglintError> {
    explicit
        .map(PathBuf::from)
        .or_else(|| config.catalog().path().map(Path::to_path_buf))
        .ok_or_else(|| ConfigError::MissingCatalog.into())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[catalog]\npath = \"build/catalog.json\"\n\n[rules]\nmax_delay = 48000\n",
        )
        .expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.rules().max_delay(), 48000);
        assert_eq!(config.rules().entry_point(), "process");
        assert_eq!(
            config.catalog().path(),
            Some(Path::new("build/catalog.json"))
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().expect("tempdir");
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SiglintError::Config(msg) if msg.contains("absent.toml")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[rules\nentry_point = ").expect("write");
        assert!(matches!(load_config(Some(&path)), Err(SiglintError::Config(_))));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[rules]\nentry_point = \"not an identifier\"\n").expect("write");
        assert!(matches!(
            load_config(Some(&path)),
            Err(SiglintError::InvalidRule { field: "entry_point", .. })
        ));
    }

    #[test]
    fn test_catalog_path_precedence() {
        let config: AppConfig = toml::from_str("[catalog]\npath = \"configured.json\"\n").expect("toml");
        assert_eq!(
            catalog_path(Some("flag.json"), &config).expect("path"),
            PathBuf::from("flag.json")
        );
        assert_eq!(
            catalog_path(None, &config).expect("path"),
            PathBuf::from("configured.json")
        );
        assert!(catalog_path(None, &AppConfig::default()).is_err());
    }
}
