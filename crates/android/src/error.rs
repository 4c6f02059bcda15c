//! Resolver errors
//!
//! Every variant falls into one of two kinds: something required is
//! missing, or something present is unusable. Both abort the build.

use droidcfg_core::validation::ValidationResult;
use droidcfg_core::{Error as CoreError, ErrorCode};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildConfigError>;

/// Broad classification used for exit codes and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// A required file or key is absent
    Missing,
    /// A present file or value is unusable
    Invalid,
}

#[derive(Error, Debug)]
pub enum BuildConfigError {
    #[error("{} not found", path.display())]
    MissingFile { path: PathBuf },

    #[error("`{key}` is not set in {}", path.display())]
    MissingKey { key: String, path: PathBuf },

    /// Credentials were absent at load time and a release build was requested
    #[error("release signing requires {}, which was not found", path.display())]
    SigningUnavailable { path: PathBuf },

    #[error("invalid `{key}` in {}: {reason}", path.display())]
    InvalidKey {
        key: String,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error("invalid build descriptor: {}", .0.join("; "))]
    Descriptor(Vec<String>),
}

impl BuildConfigError {
    pub(crate) fn invalid_key(key: &str, path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.to_string(),
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Turn failed checks on one key into [`BuildConfigError::InvalidKey`]
    pub(crate) fn check_key(key: &str, path: &Path, result: ValidationResult) -> Result<()> {
        if result.is_valid() {
            return Ok(());
        }
        let reasons: Vec<&str> = result.errors().iter().map(|e| e.message.as_str()).collect();
        Err(Self::invalid_key(key, path, reasons.join("; ")))
    }

    /// Missing vs invalid
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::MissingFile { .. } | Self::MissingKey { .. } | Self::SigningUnavailable { .. } => {
                ConfigErrorKind::Missing
            }
            Self::InvalidKey { .. } | Self::Unreadable { .. } | Self::Descriptor(_) => {
                ConfigErrorKind::Invalid
            }
        }
    }

    /// The offending property key, when there is one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. } | Self::InvalidKey { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The offending file, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MissingFile { path }
            | Self::MissingKey { path, .. }
            | Self::SigningUnavailable { path }
            | Self::InvalidKey { path, .. }
            | Self::Unreadable { path, .. } => Some(path),
            Self::Descriptor(_) => None,
        }
    }

    fn suggestion(&self) -> Option<String> {
        let file_name = self
            .path()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match (self, file_name) {
            (Self::MissingFile { .. } | Self::MissingKey { .. }, crate::toolchain::LOCAL_PROPERTIES) => Some(
                "Define the Flutter SDK location with flutter.sdk in local.properties (`flutter pub get` writes it)"
                    .to_string(),
            ),
            (Self::SigningUnavailable { path }, _) => Some(format!(
                "Create {} with storeFile, keyAlias, storePassword and keyPassword, or build the debug variant",
                path.display()
            )),
            (Self::InvalidKey { key, .. }, _) if key == crate::signing::STORE_FILE => Some(
                "storeFile is resolved relative to the app module directory".to_string(),
            ),
            (Self::InvalidKey { .. }, crate::signing::KEY_PROPERTIES) => Some(format!(
                "key.properties must define {}",
                crate::signing::REQUIRED_KEYS.join(", ")
            )),
            _ => None,
        }
    }
}

impl From<BuildConfigError> for CoreError {
    fn from(err: BuildConfigError) -> Self {
        let code = match err.kind() {
            ConfigErrorKind::Missing => ErrorCode::ConfigNotFound,
            ConfigErrorKind::Invalid => ErrorCode::InvalidConfigValue,
        };
        let mut core = CoreError::new(code, err.to_string());
        if let Some(suggestion) = err.suggestion() {
            core = core.with_suggestion(suggestion);
        }
        core.with_source(err)
    }
}
