//! Single-plugin loading.
//!
//! [`PluginLoader::load`] walks one plugin through the load steps: open the
//! unit and run its registration, read metadata, check dependencies, run
//! the activation hook and record it in the load order. Dependencies are not
//! chased here; see [`PluginLoader::load_recursive`].
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::component::ComponentRegistry;
use crate::plugin_system::dependency::Unsatisfied;
use crate::plugin_system::environment::Environment;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::info::PluginInfo;
use crate::plugin_system::source::PluginSource;
use crate::plugin_system::traits::Plugin;
use crate::utils::catch_panic;

/// How a load attempt ended, when it did not stop at an unmet dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Active,
    /// Failed for a reason other than a dependency; see the plugin's `crash`
    Crashed,
}

enum LoadFailure {
    Unsatisfied(Unsatisfied),
    Crashed(PluginError),
    /// The plugin reported a typed error of its own
    Failed(PluginError),
}

impl From<Unsatisfied> for LoadFailure {
    fn from(unsatisfied: Unsatisfied) -> Self {
        LoadFailure::Unsatisfied(unsatisfied)
    }
}

/// Plugin table, sources and dependency environment
pub struct PluginLoader {
    sources: Vec<Box<dyn PluginSource>>,
    plugins: HashMap<String, PluginInfo>,
    /// Units replaced by a reload; their registrations may still be in use
    retired: Vec<Arc<dyn Plugin>>,
    environment: Environment,
    pub(crate) resolving: Vec<String>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            plugins: HashMap::new(),
            retired: Vec::new(),
            environment: Environment::new(),
            resolving: Vec::new(),
        }
    }

    /// Sources are consulted in the order they were added
    pub fn add_source<S: PluginSource + 'static>(&mut self, source: S) {
        self.add_boxed_source(Box::new(source));
    }

    pub fn add_boxed_source(&mut self, source: Box<dyn PluginSource>) {
        debug!("Adding plugin source '{}'", source.name());
        self.sources.push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Every plugin attempted so far, including failed ones
    pub fn get_all(&self) -> &HashMap<String, PluginInfo> {
        &self.plugins
    }

    pub fn get(&self, name: &str) -> Option<&PluginInfo> {
        self.plugins.get(name)
    }

    /// Names of active plugins in activation order
    pub fn get_order(&self) -> &[String] {
        self.environment.order().as_slice()
    }

    pub fn is_crashed(&self, name: &str) -> bool {
        self.plugins.get(name).is_some_and(PluginInfo::is_crashed)
    }

    /// Names offered by all sources, first source first, without duplicates.
    ///
    /// A source that fails to list is logged and skipped.
    pub fn discover(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for source in &self.sources {
            match source.discover() {
                Ok(found) => {
                    for name in found {
                        if seen.insert(name.clone()) {
                            names.push(name);
                        }
                    }
                }
                Err(e) => warn!(" *** Plugin discovery failed: {}", e),
            }
        }
        names
    }

    /// Load a single plugin without chasing its plugin dependencies.
    ///
    /// A crash is logged and recorded on the plugin's info. An unmet
    /// dependency is returned to the caller and not recorded.
    pub fn load(&mut self, name: &str, components: &mut ComponentRegistry) -> Result<LoadOutcome, Unsatisfied> {
        debug!("Loading plugin {}", name);
        match self.try_load(name, components) {
            Ok(()) => {
                info!("Plugin {} activated", name);
                Ok(LoadOutcome::Active)
            }
            Err(LoadFailure::Unsatisfied(unsatisfied)) => {
                debug!("Plugin {} waits on {}", name, unsatisfied.dependency.describe());
                Err(unsatisfied)
            }
            Err(LoadFailure::Crashed(err)) => {
                warn!(" *** Plugin crashed: {}: {}", name, err);
                self.record_crash(name, err);
                Ok(LoadOutcome::Crashed)
            }
            Err(LoadFailure::Failed(err)) => {
                warn!(" *** Plugin failed to load: {}: {}", name, err);
                self.record_crash(name, err);
                Ok(LoadOutcome::Crashed)
            }
        }
    }

    fn try_load(&mut self, name: &str, components: &mut ComponentRegistry) -> Result<(), LoadFailure> {
        let module = match self.open_unit(name) {
            Ok(module) => module,
            Err(err) => {
                // Nothing but the name is known about the plugin
                self.store(PluginInfo::failed(name, err.clone()));
                return Err(LoadFailure::Crashed(err));
            }
        };

        // From here on the unit may own code the registry points into, so
        // every record keeps it
        let registered = catch_panic(|| module.register(components))
            .map_err(|panic| PluginError::crashed(name, format!("panicked during registration: {}", panic)))
            .and_then(|result| result);
        if let Err(err) = registered {
            self.store(PluginInfo::failed_with_module(name, err.clone(), module));
            return Err(LoadFailure::Crashed(err));
        }

        let metadata = match catch_panic(|| module.metadata()) {
            Ok(Ok(metadata)) => metadata,
            Ok(Err(err)) => {
                self.store(PluginInfo::failed_with_module(name, err.clone(), module));
                return Err(LoadFailure::Failed(err));
            }
            Err(panic) => {
                let err = PluginError::crashed(name, format!("panicked while reading metadata: {}", panic));
                self.store(PluginInfo::failed_with_module(name, err.clone(), module));
                return Err(LoadFailure::Crashed(err));
            }
        };

        // Recorded before the dependency checks so an inactive plugin still shows up
        self.store(PluginInfo::loaded(name, module, &metadata));

        for dependency in &metadata.dependencies {
            dependency.check(&self.environment)?;
        }

        if let Some(info) = self.plugins.get_mut(name) {
            info.active = true;
        }

        if let Some(init) = &metadata.init {
            match catch_panic(|| (**init)(components)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(LoadFailure::Crashed(PluginError::crashed(name, e.to_string()))),
                Err(panic) => {
                    return Err(LoadFailure::Crashed(PluginError::crashed(
                        name,
                        format!("panicked during activation: {}", panic),
                    )));
                }
            }
        }

        self.environment.order_mut().promote(name);
        Ok(())
    }

    /// Open the unit from the first source that has it
    fn open_unit(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.contains(name))
            .ok_or_else(|| PluginError::NotFound { plugin: name.to_string() })?;
        debug!("Opening plugin {} from source '{}'", name, source.name());

        catch_panic(|| source.open(name))
            .map_err(|panic| PluginError::crashed(name, format!("panicked while opening: {}", panic)))?
    }

    /// Insert `info`, keeping a replaced unit alive until [`clear`](Self::clear)
    fn store(&mut self, info: PluginInfo) {
        let replaced = self.plugins.insert(info.name.clone(), info);
        if let Some(module) = replaced.and_then(|old| old.module) {
            self.retired.push(module);
        }
    }

    /// Store `crash` on the plugin's info, creating a minimal one if needed
    pub(crate) fn record_crash(&mut self, name: &str, crash: PluginError) {
        match self.plugins.get_mut(name) {
            Some(info) => info.crash = Some(crash),
            None => self.store(PluginInfo::failed(name, crash)),
        }
    }

    /// Forget every plugin and the load order; sources are kept.
    ///
    /// Units are unloaded here, so component instances and registrations
    /// they provided must be cleared first.
    pub fn clear(&mut self) {
        self.plugins.clear();
        self.retired.clear();
        self.environment.order_mut().clear();
        self.resolving.clear();
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLoader")
            .field("sources", &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("plugins", &self.plugins)
            .field("environment", &self.environment)
            .finish()
    }
}
