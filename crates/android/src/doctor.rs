//! Non-failing configuration report
//!
//! Unlike [`Resolver`], which stops at the first problem, the doctor
//! inspects every source and both variants so the operator sees the whole
//! picture in one run.

use crate::descriptor::BuildVariant;
use crate::error::BuildConfigError;
use crate::gradle;
use crate::resolver::{load_properties, ProjectLayout, Resolver};
use crate::signing::{self, KEY_PROPERTIES};
use crate::toolchain::{self, LOCAL_PROPERTIES};
use droidcfg_core::config::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// State of one properties file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Found { entries: usize },
    Missing,
    Invalid { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: &'static str,
    pub path: PathBuf,
    /// Which variants need this source
    pub required_for: &'static str,
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub variant: BuildVariant,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub project_root: PathBuf,
    pub module_dir: PathBuf,
    pub settings_file: Option<PathBuf>,
    pub sources: Vec<SourceReport>,
    pub variants: Vec<VariantReport>,
    pub gradle_wrapper: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flutter_sdk: Option<PathBuf>,
}

impl Diagnosis {
    /// Every variant resolves
    pub fn is_healthy(&self) -> bool {
        self.variants.iter().all(|v| v.ready)
    }

    pub fn variant(&self, variant: BuildVariant) -> Option<&VariantReport> {
        self.variants.iter().find(|v| v.variant == variant)
    }
}

/// Inspect the project below `project_root`
pub fn diagnose(project_root: &Path, config: &Config) -> Diagnosis {
    let layout = ProjectLayout::new(project_root, &config.settings.android.module);

    let credentials = SourceReport {
        name: KEY_PROPERTIES,
        path: layout.credentials_file(),
        required_for: "release",
        status: source_status(&layout.credentials_file(), |props| {
            signing::resolve_signing_descriptor(props, layout.module_dir()).map(|_| ())
        }),
    };
    let toolchain_source = SourceReport {
        name: LOCAL_PROPERTIES,
        path: layout.toolchain_file(),
        required_for: "debug, release",
        status: source_status(&layout.toolchain_file(), |props| {
            toolchain::resolve_toolchain_location(props).map(|_| ())
        }),
    };

    let resolver = Resolver::discover(project_root, config.settings.clone());
    let flutter_sdk = resolver
        .as_ref()
        .ok()
        .map(|r| r.toolchain().sdk_root().to_path_buf());

    let variants = [BuildVariant::Debug, BuildVariant::Release]
        .into_iter()
        .map(|variant| {
            let outcome = match &resolver {
                Ok(r) => r.build_descriptor(variant).map(|_| ()).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            VariantReport {
                variant,
                ready: outcome.is_ok(),
                error: outcome.err(),
            }
        })
        .collect();

    Diagnosis {
        project_root: project_root.to_path_buf(),
        module_dir: layout.module_dir().to_path_buf(),
        settings_file: config.path.clone(),
        sources: vec![toolchain_source, credentials],
        variants,
        gradle_wrapper: gradle::wrapper_path(project_root).is_file(),
        flutter_sdk,
    }
}

fn source_status(
    path: &Path,
    check: impl FnOnce(&droidcfg_core::properties::PropertyMap) -> crate::error::Result<()>,
) -> SourceStatus {
    match load_properties(path) {
        Ok(props) => match check(&props) {
            Ok(()) => SourceStatus::Found {
                entries: props.len(),
            },
            Err(e) => SourceStatus::Invalid {
                reason: e.to_string(),
            },
        },
        Err(BuildConfigError::MissingFile { .. }) => SourceStatus::Missing,
        Err(e) => SourceStatus::Invalid {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_local(dir: &Path) {
        let sdk = dir.join("sdk");
        std::fs::create_dir_all(&sdk).unwrap();
        std::fs::write(dir.join(LOCAL_PROPERTIES), format!("flutter.sdk={}\n", sdk.display())).unwrap();
    }

    #[test]
    fn test_empty_project() {
        let dir = TempDir::new().unwrap();
        let diagnosis = diagnose(dir.path(), &Config::default());

        assert!(!diagnosis.is_healthy());
        assert!(diagnosis.sources.iter().all(|s| s.status == SourceStatus::Missing));
        assert!(!diagnosis.variant(BuildVariant::Debug).unwrap().ready);
        assert!(!diagnosis.gradle_wrapper);
        assert!(diagnosis.flutter_sdk.is_none());
    }

    #[test]
    fn test_debug_only_project() {
        let dir = TempDir::new().unwrap();
        with_local(dir.path());
        let diagnosis = diagnose(dir.path(), &Config::default());

        assert!(diagnosis.variant(BuildVariant::Debug).unwrap().ready);
        let release = diagnosis.variant(BuildVariant::Release).unwrap();
        assert!(!release.ready);
        assert!(release.error.as_deref().unwrap().contains(KEY_PROPERTIES));
        assert_eq!(diagnosis.flutter_sdk, Some(dir.path().join("sdk")));
        assert!(!diagnosis.is_healthy());
    }

    #[test]
    fn test_invalid_credentials_reported() {
        let dir = TempDir::new().unwrap();
        with_local(dir.path());
        std::fs::write(dir.path().join(KEY_PROPERTIES), "storeFile=k.jks\n").unwrap();

        let diagnosis = diagnose(dir.path(), &Config::default());
        let credentials = diagnosis.sources.iter().find(|s| s.name == KEY_PROPERTIES).unwrap();
        match &credentials.status {
            SourceStatus::Invalid { reason } => assert!(reason.contains("keyAlias")),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_healthy_project_serializes() {
        let dir = TempDir::new().unwrap();
        with_local(dir.path());
        std::fs::write(
            dir.path().join(KEY_PROPERTIES),
            "storeFile=k.jks\nkeyAlias=a\nstorePassword=hidden-pw\nkeyPassword=hidden-pw\n",
        )
        .unwrap();

        let diagnosis = diagnose(dir.path(), &Config::default());
        assert!(diagnosis.is_healthy());

        let json = serde_json::to_string(&diagnosis).unwrap();
        assert!(json.contains("\"status\":\"found\""));
        assert!(!json.contains("hidden-pw"));
    }
}
