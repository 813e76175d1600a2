use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::component::{Component, ComponentError, ComponentRegistry, ComponentType, Implementation};
use crate::kernel::config::LoaderConfig;
use crate::plugin_system::dependency::Unsatisfied;
use crate::plugin_system::directory::DirectorySource;
use crate::plugin_system::info::PluginInfo;
use crate::plugin_system::loader::{LoadOutcome, PluginLoader};
use crate::plugin_system::source::PluginSource;
use crate::utils::catch_panic;

/// Owns the plugin table, the load order and the component registry.
///
/// Every mutating operation takes `&mut self`; callers that share a manager
/// across threads must serialise access themselves.
pub struct PluginManager {
    // Declared first so component instances are dropped before plugin libraries
    components: ComponentRegistry,
    loader: PluginLoader,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            components: ComponentRegistry::new(),
            loader: PluginLoader::new(),
        }
    }

    /// A manager configured from `config`; see [`configure`](Self::configure)
    pub fn from_config(config: &LoaderConfig) -> Self {
        let mut manager = Self::new();
        manager.configure(config);
        manager
    }

    /// Apply the module and search path settings of `config` and add a
    /// [`DirectorySource`] on its `plugin_root` after any existing sources
    pub fn configure(&mut self, config: &LoaderConfig) {
        let environment = self.loader.environment_mut();
        environment.set_search_path(config.search_path_os());
        for module in &config.modules {
            environment.modules_mut().mark_loaded(module.clone());
        }
        for dir in &config.module_dirs {
            environment.modules_mut().add_dir(dir.clone());
        }
        debug!("Plugin root: {}", config.plugin_root.display());
        self.add_source(DirectorySource::new(config.plugin_root.clone()));
    }

    pub fn add_source<S: PluginSource + 'static>(&mut self, source: S) {
        self.loader.add_source(source);
    }

    /// Treat `name` as an already loaded module
    pub fn register_module(&mut self, name: impl Into<String>) {
        self.loader.environment_mut().modules_mut().mark_loaded(name);
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut PluginLoader {
        &mut self.loader
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    pub fn discover(&self) -> Vec<String> {
        self.loader.discover()
    }

    pub fn load_all(&mut self) {
        self.loader.load_all(&mut self.components);
    }

    pub fn load(&mut self, name: &str) -> Result<LoadOutcome, Unsatisfied> {
        self.loader.load(name, &mut self.components)
    }

    pub fn load_recursive(&mut self, name: &str) -> Result<LoadOutcome, Unsatisfied> {
        self.loader.load_recursive(name, &mut self.components)
    }

    pub fn get_all(&self) -> &HashMap<String, PluginInfo> {
        self.loader.get_all()
    }

    pub fn get_order(&self) -> &[String] {
        self.loader.get_order()
    }

    pub fn register_interface<C: ?Sized + 'static>(&mut self) {
        self.components.register_interface::<C>();
    }

    pub fn register_implementation<T: Component>(&mut self, implementation: Implementation<T>) -> Vec<ComponentType> {
        self.components.register_implementation(implementation)
    }

    pub fn get_implementations<C: ?Sized + 'static>(&self) -> &[ComponentType] {
        self.components.get_implementations::<C>()
    }

    pub fn instantiate<T: Component>(&mut self, value: T) -> Result<Arc<T>, ComponentError> {
        self.components.instantiate(value)
    }

    pub fn get_instance<T: Component + Default>(&mut self) -> Result<Arc<T>, ComponentError> {
        self.components.get_instance::<T>()
    }

    pub fn get_instances<X: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<X>> {
        self.components.get_instances::<X>()
    }

    /// Shut active plugins down newest first, then forget all plugins and components
    pub fn shutdown(&mut self) {
        let order = self.loader.get_order().to_vec();
        info!("Shutting down {} plugin(s)", order.len());
        for name in order.iter().rev() {
            let Some(module) = self.loader.get(name).and_then(|info| info.module.clone()) else {
                continue;
            };
            debug!("Shutting down plugin {}", name);
            match catch_panic(|| module.shutdown()) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(" *** Plugin {} failed to shut down: {}", name, e),
                Err(panic) => warn!(" *** Plugin {} panicked during shutdown: {}", name, panic),
            }
        }
        self.components.clear();
        self.loader.clear();
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManager")
            .field("loader", &self.loader)
            .field("components", &self.components)
            .finish()
    }
}
