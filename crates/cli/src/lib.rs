//! Terminal output for the nearby command line
//!
//! - Status messages
//! - Distance, duration and count formatting
//! - Aligned result tables
//! - JSON output and error reports

#![warn(missing_docs)]

pub mod output;
pub mod table;
