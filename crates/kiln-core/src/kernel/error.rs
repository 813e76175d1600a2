//! # Kiln Core Kernel Errors
//!
//! Defines the crate-level [`Error`] for host-side failures: reading the
//! loader configuration and building components the host depends on.
//! Per-plugin failures are not errors at this level; they are recorded as
//! [`PluginError`](crate::plugin_system::PluginError) on each plugin.
use std::path::PathBuf;
use std::result::Result as StdResult;

use crate::component::error::ComponentError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },

    #[error("Configuration error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedConfigFormat { path: PathBuf },

    /// Specific, typed component registry error
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }
}
