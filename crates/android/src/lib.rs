//! Android build configuration for Flutter projects
//!
//! This crate resolves everything the Android packaging step needs before
//! Gradle runs:
//! - Toolchain location from `local.properties`
//! - Release signing credentials from `key.properties`
//! - Static Android parameters from build settings
//! - The hand-off of the resulting descriptor to the Gradle wrapper

pub mod descriptor;
pub mod doctor;
pub mod error;
pub mod gradle;
pub mod resolver;
pub mod signing;
pub mod toolchain;

pub use descriptor::{BuildDescriptor, BuildVariant, JavaVersion};
pub use error::{BuildConfigError, ConfigErrorKind, Result};
pub use resolver::{load_properties, resolve, ProjectLayout, Resolver};
pub use signing::{resolve_signing_descriptor, Secret, SigningDescriptor};
pub use toolchain::{resolve_toolchain_location, ToolchainLocation};
