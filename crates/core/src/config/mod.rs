//! Build settings loading and schema definitions

mod loader;
mod schema;

pub use loader::{Config, SETTINGS_FILE_NAME};
pub use schema::*;
