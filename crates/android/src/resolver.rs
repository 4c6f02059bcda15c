//! Build configuration resolver
//!
//! Loads both properties sources from the project root and turns them,
//! together with the static [`BuildSettings`], into a [`BuildDescriptor`].
//!
//! The two sources fail differently:
//! - `local.properties` (toolchain) is required for every build and is
//!   checked as soon as the resolver is created
//! - `key.properties` (credentials) may be absent; that only becomes an
//!   error when a release descriptor is requested
//!
//! # Example
//!
//! ```rust,no_run
//! use droidcfg_android::{BuildVariant, Resolver};
//! use droidcfg_core::config::BuildSettings;
//!
//! let resolver = Resolver::discover("android", BuildSettings::default())?;
//! let descriptor = resolver.build_descriptor(BuildVariant::Release)?;
//! println!("{}", descriptor.application_id());
//! # Ok::<(), droidcfg_android::BuildConfigError>(())
//! ```

use crate::descriptor::{BuildDescriptor, BuildVariant};
use crate::error::{BuildConfigError, Result};
use crate::signing::{self, SigningDescriptor, KEY_PROPERTIES};
use crate::toolchain::{self, ToolchainLocation, LOCAL_PROPERTIES};
use droidcfg_core::config::BuildSettings;
use droidcfg_core::properties::PropertyMap;
use droidcfg_core::validation::Validator;
use droidcfg_core::ErrorCode;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read a properties file, mapping failures onto resolver errors
///
/// Whether a missing file is fatal is up to the caller.
pub fn load_properties(path: &Path) -> Result<PropertyMap> {
    PropertyMap::load(path).map_err(|e| match e.code {
        ErrorCode::ConfigNotFound => BuildConfigError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => BuildConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Project root and packaging module directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    module_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, module: &str) -> Self {
        let root = root.into();
        let module_dir = root.join(module);
        Self { root, module_dir }
    }

    /// Android root directory (`android/`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the module doing the packaging (`android/app`)
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join(KEY_PROPERTIES)
    }

    pub fn toolchain_file(&self) -> PathBuf {
        self.root.join(LOCAL_PROPERTIES)
    }
}

/// Loaded sources for one build invocation
#[derive(Debug, Clone)]
pub struct Resolver {
    layout: ProjectLayout,
    settings: BuildSettings,
    toolchain_props: PropertyMap,
    toolchain: ToolchainLocation,
    credentials: Option<PropertyMap>,
}

impl Resolver {
    /// Load both sources below `project_root`
    ///
    /// Fails immediately when `local.properties` or its `flutter.sdk` key
    /// is missing, or when the module setting does not name a directory
    /// below the root. A missing `key.properties` only logs a warning.
    pub fn discover(project_root: impl Into<PathBuf>, settings: BuildSettings) -> Result<Self> {
        validate_module(&settings.android.module)?;
        let layout = ProjectLayout::new(project_root, &settings.android.module);
        debug!(
            root = %layout.root().display(),
            module = %layout.module_dir().display(),
            "resolving build configuration"
        );

        let credentials_path = layout.credentials_file();
        let credentials = match load_properties(&credentials_path) {
            Ok(props) => Some(props),
            Err(BuildConfigError::MissingFile { path }) => {
                warn!(
                    path = %path.display(),
                    "{} not found; release builds will fail", KEY_PROPERTIES
                );
                None
            }
            Err(e) => return Err(e),
        };

        let toolchain_props = load_properties(&layout.toolchain_file())?;
        let toolchain = toolchain::resolve_toolchain_location(&toolchain_props)?;

        Ok(Self {
            layout,
            settings,
            toolchain_props,
            toolchain,
            credentials,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn toolchain(&self) -> &ToolchainLocation {
        &self.toolchain
    }

    /// Whether `key.properties` was found
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Resolve release signing, raising the deferred error if
    /// `key.properties` was absent
    pub fn signing(&self) -> Result<SigningDescriptor> {
        let props = self
            .credentials
            .as_ref()
            .ok_or_else(|| BuildConfigError::SigningUnavailable {
                path: self.layout.credentials_file(),
            })?;

        let signing = signing::resolve_signing_descriptor(props, self.layout.module_dir())?;
        if self.settings.signing.verify_keystore {
            signing::verify_keystore(&signing, props)?;
        }
        debug!(store_file = %signing.store_file().display(), "resolved release signing");
        Ok(signing)
    }

    /// Produce the descriptor for `variant`
    ///
    /// Debug builds carry no signing descriptor; the packager falls back to
    /// its debug keystore.
    pub fn build_descriptor(&self, variant: BuildVariant) -> Result<BuildDescriptor> {
        let signing = if variant.requires_signing() {
            Some(self.signing()?)
        } else {
            None
        };
        let version = toolchain::resolve_app_version(&self.toolchain_props)?;

        let descriptor = BuildDescriptor::assemble(
            variant,
            &self.settings.android,
            self.layout.module_dir(),
            self.toolchain.clone(),
            version,
            signing,
        )?;

        info!(
            variant = %variant,
            application_id = descriptor.application_id(),
            version_code = descriptor.version_code(),
            "build configuration resolved"
        );
        Ok(descriptor)
    }
}

/// `storeFile` is composed against the module directory, so the module must
/// be a non-empty path inside the project root
fn validate_module(module: &str) -> Result<()> {
    let result = Validator::new()
        .required("module", module)
        .relative_path("module", module)
        .validate();
    if result.is_valid() {
        return Ok(());
    }
    Err(BuildConfigError::Descriptor(
        result.errors().iter().map(ToString::to_string).collect(),
    ))
}

/// One-shot convenience: discover then build
pub fn resolve(project_root: &Path, settings: BuildSettings, variant: BuildVariant) -> Result<BuildDescriptor> {
    Resolver::discover(project_root, settings)?.build_descriptor(variant)
}
