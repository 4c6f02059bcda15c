//! Settings file loading

use super::schema::BuildSettings;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default settings file name, looked up in the project root
pub const SETTINGS_FILE_NAME: &str = "droidcfg.toml";

/// Loaded settings plus where they came from
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: BuildSettings,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load settings from an explicit path, or from `droidcfg.toml` in
    /// `project_root` when present, or fall back to defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<Self> {
        let config_path = match explicit {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(project_root),
        };

        let settings = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => {
                debug!(root = %project_root.display(), "no settings file, using defaults");
                BuildSettings::default()
            }
        };

        Ok(Self {
            settings,
            path: config_path,
        })
    }
}

fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    let candidate = project_root.join(SETTINGS_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

fn load_config_file(path: &Path) -> Result<BuildSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorCode::ConfigError,
            format!("Failed to read settings file {}: {}", path.display(), e),
        )
        .with_source(e)
    })?;

    debug!(path = %path.display(), "loading build settings");

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse settings file {}: {}", path.display(), e),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.settings.android.min_sdk, 21);
        assert_eq!(config.settings.android.module, "app");
        assert!(!config.settings.signing.verify_keystore);
    }

    #[test]
    fn test_config_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert!(config.path.is_none());
        assert_eq!(config.settings, BuildSettings::default());
    }

    #[test]
    fn test_config_load_discovers_project_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            "[android]\nnamespace = \"com.example.demo\"\nmin_sdk = 24\n\n[signing]\nverify_keystore = true\n",
        )
        .unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert!(config.path.is_some());
        assert_eq!(config.settings.android.namespace, "com.example.demo");
        assert_eq!(config.settings.android.min_sdk, 24);
        // untouched fields keep defaults
        assert_eq!(config.settings.android.compile_sdk, 35);
        assert!(config.settings.signing.verify_keystore);
    }

    #[test]
    fn test_config_load_explicit_missing() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[android\nmin_sdk = ").unwrap();

        let err = Config::load(Some(&path), dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.message.contains("custom.toml"));
    }
}
