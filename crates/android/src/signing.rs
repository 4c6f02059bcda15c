//! Release signing credentials
//!
//! Reads the four signing keys from `key.properties` and composes the
//! keystore path against the packaging module directory. The credentials
//! are only plumbed through to the external signer; nothing here touches
//! the keystore contents.

use crate::error::{BuildConfigError, Result};
use droidcfg_core::properties::PropertyMap;
use droidcfg_core::validation::Validator;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Credentials file name, looked up in the project root
pub const KEY_PROPERTIES: &str = "key.properties";

pub const STORE_FILE: &str = "storeFile";
pub const KEY_ALIAS: &str = "keyAlias";
pub const STORE_PASSWORD: &str = "storePassword";
pub const KEY_PASSWORD: &str = "keyPassword";

/// Keys `key.properties` must define, in lookup order
pub const REQUIRED_KEYS: [&str; 4] = [STORE_FILE, KEY_ALIAS, STORE_PASSWORD, KEY_PASSWORD];

const REDACTED: &str = "********";

/// A password that never shows up in logs or printed output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for handing to the signer
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Everything the signer needs for a release artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningDescriptor {
    store_file: PathBuf,
    key_alias: String,
    store_password: Secret,
    key_password: Secret,
}

impl SigningDescriptor {
    /// Keystore path, already composed against the module directory
    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn store_password(&self) -> &Secret {
        &self.store_password
    }

    pub fn key_password(&self) -> &Secret {
        &self.key_password
    }
}

/// Build a [`SigningDescriptor`] from parsed `key.properties`
///
/// `storeFile` is joined onto `module_dir` (the directory of the module
/// doing the packaging, e.g. `android/app`), not the project root. An
/// absolute `storeFile` is used as-is. The other values are copied
/// verbatim. The first missing or blank key fails the resolution.
pub fn resolve_signing_descriptor(props: &PropertyMap, module_dir: &Path) -> Result<SigningDescriptor> {
    let require = |key: &str| {
        props
            .get_non_empty(key)
            .ok_or_else(|| BuildConfigError::invalid_key(key, props.path(), "missing or empty"))
    };

    let store_file = require(STORE_FILE)?;
    let key_alias = require(KEY_ALIAS)?;
    let store_password = require(STORE_PASSWORD)?;
    let key_password = require(KEY_PASSWORD)?;

    Ok(SigningDescriptor {
        store_file: module_dir.join(store_file),
        key_alias: key_alias.to_string(),
        store_password: Secret::new(store_password),
        key_password: Secret::new(key_password),
    })
}

/// Fail early when the composed keystore path is not a file
pub fn verify_keystore(signing: &SigningDescriptor, props: &PropertyMap) -> Result<()> {
    BuildConfigError::check_key(
        STORE_FILE,
        props.path(),
        Validator::new().is_file(STORE_FILE, &signing.store_file).validate(),
    )
}
