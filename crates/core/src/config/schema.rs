//! Build settings schema
//!
//! Static Android parameters that are not read from properties files. The
//! defaults mirror what the Flutter Gradle plugin hands to the Android
//! Gradle Plugin when a project does not override them.

use serde::{Deserialize, Serialize};

/// Root of `droidcfg.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuildSettings {
    #[serde(default)]
    pub android: AndroidSettings,

    #[serde(default)]
    pub signing: SigningSettings,
}

/// Statically declared Android build parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidSettings {
    /// Kotlin/Java namespace for generated R classes
    #[serde(default = "default_identifier")]
    pub namespace: String,

    /// Package name published to the store
    #[serde(default = "default_identifier")]
    pub application_id: String,

    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,

    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,

    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    #[serde(default = "default_ndk_version")]
    pub ndk_version: String,

    /// Java source/target compatibility and Kotlin JVM target
    #[serde(default = "default_java_version")]
    pub java_version: u32,

    /// Packaging module directory, relative to the project root
    #[serde(default = "default_module")]
    pub module: String,

    /// Flutter project source, relative to the packaging module
    #[serde(default = "default_framework_source")]
    pub framework_source: String,

    /// Used when `flutter.versionCode` is absent from local.properties
    #[serde(default = "default_version_code")]
    pub version_code: u32,

    /// Used when `flutter.versionName` is absent from local.properties
    #[serde(default = "default_version_name")]
    pub version_name: String,
}

impl Default for AndroidSettings {
    fn default() -> Self {
        Self {
            namespace: default_identifier(),
            application_id: default_identifier(),
            compile_sdk: default_compile_sdk(),
            target_sdk: default_target_sdk(),
            min_sdk: default_min_sdk(),
            ndk_version: default_ndk_version(),
            java_version: default_java_version(),
            module: default_module(),
            framework_source: default_framework_source(),
            version_code: default_version_code(),
            version_name: default_version_name(),
        }
    }
}

fn default_identifier() -> String {
    "online.iprofi.crypto_scanner".to_string()
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_target_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_ndk_version() -> String {
    "27.0.12077973".to_string()
}

fn default_java_version() -> u32 {
    11
}

fn default_module() -> String {
    "app".to_string()
}

fn default_framework_source() -> String {
    "../..".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0".to_string()
}

/// Release signing options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SigningSettings {
    /// Check that the keystore exists while resolving instead of leaving it
    /// to the signer
    #[serde(default)]
    pub verify_keystore: bool,
}
