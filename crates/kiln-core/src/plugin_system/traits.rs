use std::fmt;
use std::sync::Arc;

use crate::component::{BoxError, ComponentRegistry};
use crate::plugin_system::dependency::Dependency;
use crate::plugin_system::error::PluginError;

/// Result of an activation hook
pub type HookResult = Result<(), BoxError>;

/// Activation hook, run once the plugin's dependencies are satisfied
pub type InitHook = Arc<dyn Fn(&mut ComponentRegistry) -> HookResult + Send + Sync>;

/// Metadata a plugin declares about itself
#[derive(Clone)]
pub struct PluginMetadata {
    /// Human-readable title
    pub title: String,
    pub description: Option<String>,
    /// Checked in order; the first unmet one stops activation
    pub dependencies: Vec<Dependency>,
    pub init: Option<InitHook>,
}

impl PluginMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            dependencies: Vec::new(),
            init: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn depends_on(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ComponentRegistry) -> HookResult + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for PluginMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginMetadata")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("init", &self.init.is_some())
            .finish()
    }
}

/// A loaded plugin unit.
///
/// Sources produce a fresh value for every load attempt. [`register`](Plugin::register)
/// runs as part of loading the unit, before metadata is read or dependencies
/// are checked, so capabilities and implementations a plugin defines exist
/// even if it never activates.
pub trait Plugin: Send + Sync {
    /// Read the plugin's declared metadata
    fn metadata(&self) -> Result<PluginMetadata, PluginError>;

    /// Register the plugin's capabilities and component implementations
    fn register(&self, _components: &mut ComponentRegistry) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called for active plugins when the manager shuts down, newest first
    fn shutdown(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
