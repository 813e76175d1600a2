use std::fmt;
use std::sync::Arc;

use crate::plugin_system::dependency::Dependency;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::traits::{InitHook, Plugin, PluginMetadata};

/// Coarse state of a plugin for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Active,
    Crashed,
    /// Known but not activated, e.g. stopped at an unmet dependency
    Inactive,
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginStatus::Active => write!(f, "active"),
            PluginStatus::Crashed => write!(f, "crashed"),
            PluginStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// What the loader knows about one attempted plugin.
///
/// Presence in the plugin table does not mean the plugin activated; check
/// [`crash`](Self::crash) or [`status`](Self::status).
#[derive(Clone)]
pub struct PluginInfo {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Set before the activation hook runs and not reset if it fails
    pub active: bool,
    pub crash: Option<PluginError>,
    pub dependencies: Vec<Dependency>,
    pub init: Option<InitHook>,
    /// Dropped last: the hook above may live in the unit's library
    pub module: Option<Arc<dyn Plugin>>,
}

impl PluginInfo {
    /// Info for a plugin whose unit could not be loaded at all
    pub fn failed(name: impl Into<String>, crash: PluginError) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            active: false,
            crash: Some(crash),
            dependencies: Vec::new(),
            init: None,
            module: None,
        }
    }

    /// Info for a plugin that failed after its unit was opened and
    /// registered. The unit is kept since registrations may refer to its code.
    pub fn failed_with_module(name: impl Into<String>, crash: PluginError, module: Arc<dyn Plugin>) -> Self {
        Self {
            module: Some(module),
            ..Self::failed(name, crash)
        }
    }

    pub(crate) fn loaded(name: &str, module: Arc<dyn Plugin>, metadata: &PluginMetadata) -> Self {
        Self {
            name: name.to_string(),
            title: Some(metadata.title.clone()),
            description: metadata.description.clone(),
            active: false,
            crash: None,
            dependencies: metadata.dependencies.clone(),
            init: metadata.init.clone(),
            module: Some(module),
        }
    }

    pub fn is_crashed(&self) -> bool {
        self.crash.is_some()
    }

    pub fn status(&self) -> PluginStatus {
        if self.crash.is_some() {
            PluginStatus::Crashed
        } else if self.active {
            PluginStatus::Active
        } else {
            PluginStatus::Inactive
        }
    }
}

impl fmt::Debug for PluginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInfo")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("active", &self.active)
            .field("crash", &self.crash)
            .field("dependencies", &self.dependencies)
            .field("init", &self.init.is_some())
            .field("module", &self.module.is_some())
            .finish()
    }
}
