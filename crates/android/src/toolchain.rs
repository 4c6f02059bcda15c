//! Flutter toolchain location
//!
//! `local.properties` must name the Flutter SDK for every build variant.
//! The same file also carries the app version Flutter derives from
//! `pubspec.yaml`.

use crate::error::{BuildConfigError, Result};
use droidcfg_core::properties::PropertyMap;
use droidcfg_core::validation::Validator;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Toolchain file name, looked up in the project root
pub const LOCAL_PROPERTIES: &str = "local.properties";

/// Flutter SDK install directory
pub const SDK_ROOT_KEY: &str = "flutter.sdk";
pub const VERSION_CODE_KEY: &str = "flutter.versionCode";
pub const VERSION_NAME_KEY: &str = "flutter.versionName";

/// Where the framework toolchain is installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainLocation {
    sdk_root: PathBuf,
}

impl ToolchainLocation {
    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }
}

/// Read `flutter.sdk` and check it points at a directory
///
/// `~` and environment variables are expanded. A relative value is taken
/// relative to the directory holding `local.properties`.
pub fn resolve_toolchain_location(props: &PropertyMap) -> Result<ToolchainLocation> {
    let raw = props
        .get_non_empty(SDK_ROOT_KEY)
        .ok_or_else(|| BuildConfigError::MissingKey {
            key: SDK_ROOT_KEY.to_string(),
            path: props.path().to_path_buf(),
        })?;

    let expanded = shellexpand::full(raw)
        .map_err(|e| BuildConfigError::invalid_key(SDK_ROOT_KEY, props.path(), e.to_string()))?;

    let mut sdk_root = PathBuf::from(expanded.into_owned());
    if sdk_root.is_relative() {
        if let Some(base) = props.path().parent() {
            sdk_root = base.join(sdk_root);
        }
    }

    BuildConfigError::check_key(
        SDK_ROOT_KEY,
        props.path(),
        Validator::new().is_directory(SDK_ROOT_KEY, &sdk_root).validate(),
    )?;

    debug!(sdk_root = %sdk_root.display(), "resolved Flutter SDK");
    Ok(ToolchainLocation { sdk_root })
}

/// App version written by Flutter, when present
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppVersion {
    pub code: Option<u32>,
    pub name: Option<String>,
}

/// Read `flutter.versionCode` / `flutter.versionName`
pub fn resolve_app_version(props: &PropertyMap) -> Result<AppVersion> {
    let code = props
        .get_non_empty(VERSION_CODE_KEY)
        .map(|raw| {
            raw.trim().parse::<u32>().map_err(|_| {
                BuildConfigError::invalid_key(
                    VERSION_CODE_KEY,
                    props.path(),
                    format!("`{}` is not a positive integer", raw),
                )
            })
        })
        .transpose()?;

    let name = props.get_non_empty(VERSION_NAME_KEY).map(str::to_string);

    Ok(AppVersion { code, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorKind;
    use tempfile::TempDir;

    fn local(dir: &Path, pairs: &[(&str, &str)]) -> PropertyMap {
        PropertyMap::from_pairs(dir.join(LOCAL_PROPERTIES), pairs.iter().copied())
    }

    #[test]
    fn test_resolves_existing_sdk() {
        let dir = TempDir::new().unwrap();
        let sdk = dir.path().join("flutter");
        std::fs::create_dir(&sdk).unwrap();

        let location = resolve_toolchain_location(&local(dir.path(), &[(SDK_ROOT_KEY, sdk.to_str().unwrap())])).unwrap();
        assert_eq!(location.sdk_root(), sdk.as_path());
    }

    #[test]
    fn test_relative_sdk_resolves_against_properties_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sdk")).unwrap();

        let location = resolve_toolchain_location(&local(dir.path(), &[(SDK_ROOT_KEY, "sdk")])).unwrap();
        assert_eq!(location.sdk_root(), dir.path().join("sdk"));
    }

    #[test]
    fn test_missing_key_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let err = resolve_toolchain_location(&local(dir.path(), &[("sdk.dir", "/opt/android")])).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::Missing);
        assert_eq!(err.key(), Some(SDK_ROOT_KEY));
    }

    #[test]
    fn test_nonexistent_directory_is_invalid() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let err = resolve_toolchain_location(&local(dir.path(), &[(SDK_ROOT_KEY, missing.to_str().unwrap())])).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::Invalid);
        assert!(err.to_string().contains("Not a directory"), "{err}");
    }

    #[test]
    fn test_sdk_pointing_at_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("flutter");
        std::fs::write(&file, b"").unwrap();

        let err = resolve_toolchain_location(&local(dir.path(), &[(SDK_ROOT_KEY, "flutter")])).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::Invalid);
        assert_eq!(err.key(), Some(SDK_ROOT_KEY));
        assert!(err.to_string().contains(&file.display().to_string()), "{err}");
    }

    #[test]
    fn test_undefined_variable_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err = resolve_toolchain_location(&local(
            dir.path(),
            &[(SDK_ROOT_KEY, "$DROIDCFG_SURELY_UNDEFINED_VAR/flutter")],
        ))
        .unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::Invalid);
        assert_eq!(err.key(), Some(SDK_ROOT_KEY));
    }

    #[test]
    fn test_app_version() {
        let dir = TempDir::new().unwrap();
        let version = resolve_app_version(&local(
            dir.path(),
            &[(VERSION_CODE_KEY, "42"), (VERSION_NAME_KEY, "2.1.0")],
        ))
        .unwrap();
        assert_eq!(version.code, Some(42));
        assert_eq!(version.name.as_deref(), Some("2.1.0"));

        let version = resolve_app_version(&local(dir.path(), &[])).unwrap();
        assert_eq!(version, AppVersion::default());
    }

    #[test]
    fn test_app_version_code_must_be_numeric() {
        let dir = TempDir::new().unwrap();
        let err = resolve_app_version(&local(dir.path(), &[(VERSION_CODE_KEY, "1.0")])).unwrap_err();
        assert_eq!(err.key(), Some(VERSION_CODE_KEY));
        assert_eq!(err.kind(), ConfigErrorKind::Invalid);
    }
}
