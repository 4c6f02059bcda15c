//! The resolved build descriptor handed to the packager

use crate::error::{BuildConfigError, Result};
use crate::signing::SigningDescriptor;
use crate::toolchain::{AppVersion, ToolchainLocation};
use droidcfg_core::config::AndroidSettings;
use droidcfg_core::validation::{Validator, JAVA_PACKAGE_PATTERN};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Largest versionCode Google Play accepts
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    Release,
}

impl BuildVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Suffix used in Gradle task names (`assembleRelease`)
    pub fn task_suffix(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }

    /// Only release artifacts are signed with the upload key
    pub fn requires_signing(&self) -> bool {
        matches!(self, Self::Release)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => Err(format!("unknown build variant `{}` (expected debug or release)", other)),
        }
    }
}

/// Java source/target compatibility level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaVersion {
    V1_8,
    V11,
    V17,
    V21,
}

impl JavaVersion {
    pub const SUPPORTED: [u32; 4] = [8, 11, 17, 21];

    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            8 => Some(Self::V1_8),
            11 => Some(Self::V11),
            17 => Some(Self::V17),
            21 => Some(Self::V21),
            _ => None,
        }
    }

    /// `JavaVersion` constant name in Gradle (`VERSION_11`)
    pub fn gradle_constant(&self) -> &'static str {
        match self {
            Self::V1_8 => "VERSION_1_8",
            Self::V11 => "VERSION_11",
            Self::V17 => "VERSION_17",
            Self::V21 => "VERSION_21",
        }
    }

    /// Kotlin `jvmTarget` string
    pub fn jvm_target(&self) -> &'static str {
        match self {
            Self::V1_8 => "1.8",
            Self::V11 => "11",
            Self::V17 => "17",
            Self::V21 => "21",
        }
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.jvm_target())
    }
}

/// Fully resolved, validated configuration for one build
///
/// `signing` is present exactly when the variant is release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    variant: BuildVariant,
    application_id: String,
    namespace: String,
    compile_sdk_version: u32,
    target_sdk_version: u32,
    min_sdk_version: u32,
    ndk_version: String,
    version_code: u32,
    version_name: String,
    java_compatibility: JavaVersion,
    toolchain: ToolchainLocation,
    framework_source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing: Option<SigningDescriptor>,
}

impl BuildDescriptor {
    /// Merge static settings with the resolved sources and validate the result
    pub(crate) fn assemble(
        variant: BuildVariant,
        settings: &AndroidSettings,
        module_dir: &Path,
        toolchain: ToolchainLocation,
        version: AppVersion,
        signing: Option<SigningDescriptor>,
    ) -> Result<Self> {
        debug_assert_eq!(variant.requires_signing(), signing.is_some());

        let version_code = version.code.unwrap_or(settings.version_code);
        let version_name = version.name.unwrap_or_else(|| settings.version_name.clone());

        let result = Validator::new()
            .required("namespace", &settings.namespace)
            .pattern("namespace", &settings.namespace, &JAVA_PACKAGE_PATTERN, "a Java package name")
            .required("application_id", &settings.application_id)
            .pattern(
                "application_id",
                &settings.application_id,
                &JAVA_PACKAGE_PATTERN,
                "a Java package name",
            )
            .at_most("min_sdk", settings.min_sdk, "target_sdk", settings.target_sdk)
            .at_most("target_sdk", settings.target_sdk, "compile_sdk", settings.compile_sdk)
            .range("version_code", version_code, 1, MAX_VERSION_CODE)
            .required("version_name", &version_name)
            .required("ndk_version", &settings.ndk_version)
            .one_of("java_version", settings.java_version, &JavaVersion::SUPPORTED)
            .validate();

        if !result.is_valid() {
            return Err(BuildConfigError::Descriptor(
                result.errors().iter().map(ToString::to_string).collect(),
            ));
        }

        let java_compatibility = JavaVersion::from_major(settings.java_version)
            .ok_or_else(|| BuildConfigError::Descriptor(vec![format!(
                "java_version: unsupported {}",
                settings.java_version
            )]))?;

        Ok(Self {
            variant,
            application_id: settings.application_id.clone(),
            namespace: settings.namespace.clone(),
            compile_sdk_version: settings.compile_sdk,
            target_sdk_version: settings.target_sdk,
            min_sdk_version: settings.min_sdk,
            ndk_version: settings.ndk_version.clone(),
            version_code,
            version_name,
            java_compatibility,
            toolchain,
            framework_source: module_dir.join(&settings.framework_source),
            signing,
        })
    }

    pub fn variant(&self) -> BuildVariant {
        self.variant
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn compile_sdk_version(&self) -> u32 {
        self.compile_sdk_version
    }

    pub fn target_sdk_version(&self) -> u32 {
        self.target_sdk_version
    }

    pub fn min_sdk_version(&self) -> u32 {
        self.min_sdk_version
    }

    pub fn ndk_version(&self) -> &str {
        &self.ndk_version
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn java_compatibility(&self) -> JavaVersion {
        self.java_compatibility
    }

    pub fn toolchain(&self) -> &ToolchainLocation {
        &self.toolchain
    }

    /// Flutter project directory (`flutter { source = "../.." }`)
    pub fn framework_source(&self) -> &Path {
        &self.framework_source
    }

    /// Release signing, `None` for debug builds
    pub fn signing(&self) -> Option<&SigningDescriptor> {
        self.signing.as_ref()
    }
}
