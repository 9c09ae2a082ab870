//! Configuration loading and schema definitions
//!
//! `.nearby.toml` holds defaults for the engine, travel estimates and logging.
//! Every key is optional.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_FILE_CANDIDATES};
pub use schema::*;
