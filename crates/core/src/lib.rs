//! Shared application layer for the nearby tools
//!
//! - **Error handling**: coded errors with context, recovery suggestions and exit codes,
//!   folding in the geo, search and travel library errors
//! - **Configuration**: TOML-based `.nearby.toml` loading with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use nearby_core::config::Config;
//! use nearby_search::SearchEngine;
//!
//! let config = Config::load(None)?;
//! let engine = SearchEngine::new(config.schema.search.to_search_config())?;
//! # Ok::<(), nearby_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
