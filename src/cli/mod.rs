//! Command-line support for the `star-schema` binary

pub mod commands;
pub mod error;
pub mod logging;
pub mod progress;
