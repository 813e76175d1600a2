//! Dependency-chasing on top of [`PluginLoader::load`].
use log::{debug, warn};

use crate::component::ComponentRegistry;
use crate::plugin_system::dependency::Unsatisfied;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::loader::{LoadOutcome, PluginLoader};

impl PluginLoader {
    /// Load `name`, first loading any plugin dependency it is missing.
    ///
    /// An unmet dependency that is not a plugin is recorded as the crash of
    /// the plugin declaring it and returned. Every plugin waiting on that
    /// plugin is crashed through its own plugin dependency. A dependency
    /// that already crashed, or one that closes a cycle, crashes `name`.
    pub fn load_recursive(
        &mut self,
        name: &str,
        components: &mut ComponentRegistry,
    ) -> Result<LoadOutcome, Unsatisfied> {
        self.resolving.push(name.to_string());
        let result = self.resolve(name, components);
        self.resolving.pop();
        result
    }

    fn resolve(&mut self, name: &str, components: &mut ComponentRegistry) -> Result<LoadOutcome, Unsatisfied> {
        loop {
            let unsatisfied = match self.load(name, components) {
                Ok(outcome) => return Ok(outcome),
                Err(unsatisfied) => unsatisfied,
            };

            let Some(dependency) = unsatisfied.plugin_name().map(str::to_owned) else {
                warn!(" *** Plugin dependency unsatisfied: {} -> {}", name, unsatisfied);
                self.record_crash(name, PluginError::Unsatisfied(unsatisfied.clone()));
                return Err(unsatisfied);
            };

            if self.is_crashed(&dependency) {
                warn!(" *** Plugin dependency unsatisfied: {} -> {}", name, dependency);
                self.record_crash(name, PluginError::Unsatisfied(unsatisfied));
                return Ok(LoadOutcome::Crashed);
            }

            if let Some(start) = self.resolving.iter().position(|n| *n == dependency) {
                let mut cycle = self.resolving[start..].to_vec();
                cycle.push(dependency);
                let err = PluginError::CyclicDependency(cycle);
                warn!(" *** Plugin crashed: {}: {}", name, err);
                self.record_crash(name, err);
                return Ok(LoadOutcome::Crashed);
            }

            debug!("Preloading plugin dependency: {}", dependency);
            if let Err(nested) = self.load_recursive(&dependency, components) {
                warn!(" *** Plugin dependency unsatisfied: {} -> {}", name, dependency);
                // The dependent failed on the plugin edge; the caller still gets the root cause
                self.record_crash(name, PluginError::Unsatisfied(unsatisfied));
                return Err(nested);
            }
        }
    }

    /// Attempt every discovered plugin that is not yet in the table.
    ///
    /// The table is re-checked before each attempt, so plugins pulled in as
    /// dependencies earlier in the sweep are not loaded twice.
    pub fn load_all(&mut self, components: &mut ComponentRegistry) {
        for name in self.discover() {
            if self.get(&name).is_some() {
                continue;
            }
            if let Err(unsatisfied) = self.load_recursive(&name, components) {
                warn!(" *** Plugin {} not activated: {}", name, unsatisfied);
                if !self.is_crashed(&name) {
                    self.record_crash(&name, PluginError::Unsatisfied(unsatisfied));
                }
            }
        }
    }
}
