//! Core utilities for droidcfg
//!
//! Shared functionality used by the Android resolver and the CLI:
//!
//! - **Error handling**: errors with codes, context, recovery suggestions and exit codes
//! - **Properties files**: parser for `key=value` files such as `local.properties`
//! - **Configuration**: TOML build settings with defaults
//! - **Validation**: fluent validator that reports every problem at once
//! - **Process execution**: command execution for the Gradle hand-off
//!
//! # Example
//!
//! ```rust,no_run
//! use droidcfg_core::{config::Config, properties::PropertyMap};
//! use std::path::Path;
//!
//! let root = Path::new("android");
//! let config = Config::load(None, root).expect("settings");
//! let local = PropertyMap::load(root.join("local.properties")).expect("local.properties");
//!
//! println!("{} -> {:?}", config.settings.android.namespace, local.get("flutter.sdk"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod properties;
pub mod validation;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{BuildSettings, Config};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::properties::PropertyMap;
    pub use crate::validation::{ValidationResult, Validator};
}
