//! Gradle hand-off
//!
//! Passes a resolved [`BuildDescriptor`] to the project's Gradle wrapper as
//! project properties, supplied as `ORG_GRADLE_PROJECT_*` environment
//! variables so passwords stay off the command line:
//! - the app version under the Flutter plugin's `flutter.versionCode` /
//!   `flutter.versionName`
//! - the remaining Android parameters under `droidcfg.*`, for the module's
//!   build script to read (`project.property("droidcfg.minSdk")`)
//! - release signing under the Android Gradle Plugin's injected signing
//!   properties

use crate::descriptor::{BuildDescriptor, BuildVariant};
use crate::signing::SigningDescriptor;
use crate::toolchain::{VERSION_CODE_KEY, VERSION_NAME_KEY};
use droidcfg_core::error::{Error, ErrorCode, Result};
use droidcfg_core::process::{run_command_in_dir, run_command_streaming_in_dir, CommandResult};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const INJECTED_STORE_FILE: &str = "android.injected.signing.store.file";
pub const INJECTED_STORE_PASSWORD: &str = "android.injected.signing.store.password";
pub const INJECTED_KEY_ALIAS: &str = "android.injected.signing.key.alias";
pub const INJECTED_KEY_PASSWORD: &str = "android.injected.signing.key.password";

pub const APPLICATION_ID_PROPERTY: &str = "droidcfg.applicationId";
pub const NAMESPACE_PROPERTY: &str = "droidcfg.namespace";
pub const COMPILE_SDK_PROPERTY: &str = "droidcfg.compileSdk";
pub const TARGET_SDK_PROPERTY: &str = "droidcfg.targetSdk";
pub const MIN_SDK_PROPERTY: &str = "droidcfg.minSdk";
pub const NDK_VERSION_PROPERTY: &str = "droidcfg.ndkVersion";
pub const JAVA_VERSION_PROPERTY: &str = "droidcfg.javaVersion";

/// Gradle turns `ORG_GRADLE_PROJECT_<name>` into project property `<name>`
pub const PROJECT_PROPERTY_ENV_PREFIX: &str = "ORG_GRADLE_PROJECT_";

/// Path of the Gradle wrapper script in `project_dir`
pub fn wrapper_path(project_dir: &Path) -> PathBuf {
    let gradle_wrapper = if cfg!(windows) {
        "gradlew.bat"
    } else {
        "gradlew"
    };
    project_dir.join(gradle_wrapper)
}

/// `assembleRelease`, `bundleDebug`, ...
pub fn task_name(variant: BuildVariant, bundle: bool) -> String {
    let verb = if bundle { "bundle" } else { "assemble" };
    format!("{}{}", verb, variant.task_suffix())
}

/// Project properties carrying the descriptor's Android parameters
pub fn descriptor_properties(descriptor: &BuildDescriptor) -> Vec<(&'static str, String)> {
    vec![
        (APPLICATION_ID_PROPERTY, descriptor.application_id().to_string()),
        (NAMESPACE_PROPERTY, descriptor.namespace().to_string()),
        (COMPILE_SDK_PROPERTY, descriptor.compile_sdk_version().to_string()),
        (TARGET_SDK_PROPERTY, descriptor.target_sdk_version().to_string()),
        (MIN_SDK_PROPERTY, descriptor.min_sdk_version().to_string()),
        (NDK_VERSION_PROPERTY, descriptor.ndk_version().to_string()),
        (JAVA_VERSION_PROPERTY, descriptor.java_compatibility().jvm_target().to_string()),
        (VERSION_CODE_KEY, descriptor.version_code().to_string()),
        (VERSION_NAME_KEY, descriptor.version_name().to_string()),
    ]
}

/// Injected signing properties for a release build
pub fn injected_signing_properties(signing: &SigningDescriptor) -> Vec<(&'static str, String)> {
    vec![
        (INJECTED_STORE_FILE, signing.store_file().display().to_string()),
        (INJECTED_STORE_PASSWORD, signing.store_password().expose().to_string()),
        (INJECTED_KEY_ALIAS, signing.key_alias().to_string()),
        (INJECTED_KEY_PASSWORD, signing.key_password().expose().to_string()),
    ]
}

/// A planned Gradle run
#[derive(Clone)]
pub struct GradleInvocation {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl GradleInvocation {
    /// Plan the packaging task for `descriptor`
    pub fn for_descriptor(descriptor: &BuildDescriptor, project_dir: &Path, bundle: bool) -> Self {
        let signing = descriptor
            .signing()
            .map(injected_signing_properties)
            .unwrap_or_default();
        let env = descriptor_properties(descriptor)
            .into_iter()
            .chain(signing)
            .map(|(name, value)| (format!("{}{}", PROJECT_PROPERTY_ENV_PREFIX, name), value))
            .collect();

        Self {
            program: wrapper_path(project_dir),
            args: vec![task_name(descriptor.variant(), bundle)],
            env,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Printable form with passwords masked
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.program.display(), self.args.join(" "));
        for (key, value) in &self.env {
            let shown = if key.ends_with("password") { "********" } else { value.as_str() };
            out.push_str(&format!("\n  {}={}", key, shown));
        }
        out
    }

    /// Run with output streamed to the terminal, returning the exit code
    pub fn run(&self, project_dir: &Path) -> Result<i32> {
        if !self.program.is_file() {
            return Err(Error::new(
                ErrorCode::GradleError,
                format!("Gradle wrapper not found: {}", self.program.display()),
            )
            .with_suggestion("Run from the Android project root or pass --project-dir"));
        }

        debug!(program = %self.program.display(), args = ?self.args, "starting Gradle");
        run_command_streaming_in_dir(&self.program, &self.args, project_dir, &self.env)
    }
}

impl std::fmt::Debug for GradleInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradleInvocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &self.env.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

/// Clean build artifacts
pub fn clean(project_dir: &Path) -> Result<CommandResult> {
    let wrapper = wrapper_path(project_dir);
    run_command_in_dir(&wrapper.to_string_lossy(), &["clean"], project_dir)
}
