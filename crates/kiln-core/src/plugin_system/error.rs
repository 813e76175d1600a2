//! # Kiln Core Plugin System Errors
//!
//! [`PluginError`] is the failure recorded in
//! [`PluginInfo::crash`](crate::plugin_system::PluginInfo::crash) and
//! returned by plugin sources. It is `Clone` so the same value can be stored
//! on the plugin's info and handed back to the caller.
use std::path::PathBuf;

use crate::plugin_system::dependency::Unsatisfied;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// A declared dependency was not met
    #[error(transparent)]
    Unsatisfied(#[from] Unsatisfied),

    /// The plugin's own code failed: metadata read, registration or activation hook
    #[error("crashed: {message}")]
    Crashed { plugin: String, message: String },

    #[error("plugin '{plugin}' was not found in any source")]
    NotFound { plugin: String },

    #[error("invalid manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("library '{}' could not be loaded: {message}", path.display())]
    Library { path: PathBuf, message: String },

    #[error("plugin '{plugin}' requires API '{required}' but the host provides '{actual}'")]
    IncompatibleApi {
        plugin: String,
        required: String,
        actual: String,
    },

    #[error("circular plugin dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("discovery failed in source '{source_name}': {message}")]
    Discovery { source_name: String, message: String },
}

impl PluginError {
    pub fn crashed(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        PluginError::Crashed {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// The unmet dependency, if this is a dependency failure
    pub fn unsatisfied(&self) -> Option<&Unsatisfied> {
        match self {
            PluginError::Unsatisfied(unsatisfied) => Some(unsatisfied),
            _ => None,
        }
    }
}
