use std::fmt;
use std::sync::Arc;

use crate::plugin_system::error::PluginError;
use crate::plugin_system::traits::Plugin;

/// Where plugins come from.
///
/// The loader asks each source in registration order; the first one that
/// [`contains`](PluginSource::contains) a name serves it.
pub trait PluginSource: Send + Sync {
    /// Short label used in log messages
    fn name(&self) -> &str;

    /// Names of every plugin this source can currently provide
    fn discover(&self) -> Result<Vec<String>, PluginError>;

    fn contains(&self, plugin: &str) -> bool;

    /// Produce a fresh unit for `plugin`
    fn open(&self, plugin: &str) -> Result<Arc<dyn Plugin>, PluginError>;
}

type PluginFactory = Box<dyn Fn() -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

/// Plugins compiled into the host, listed in registration order
pub struct StaticSource {
    name: String,
    entries: Vec<(String, PluginFactory)>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Register `factory` under `plugin`, replacing an earlier entry of the same name in place
    pub fn register_factory<F>(&mut self, plugin: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        let plugin = plugin.into();
        let factory: PluginFactory = Box::new(factory);
        match self.entries.iter_mut().find(|(name, _)| *name == plugin) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((plugin, factory)),
        }
    }

    pub fn register_plugin<P>(&mut self, plugin: impl Into<String>)
    where
        P: Plugin + Default + 'static,
    {
        self.register_factory(plugin, || Ok(Arc::new(P::default()) as Arc<dyn Plugin>));
    }

    pub fn with_plugin<P>(mut self, plugin: impl Into<String>) -> Self
    where
        P: Plugin + Default + 'static,
    {
        self.register_plugin::<P>(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PluginSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn discover(&self) -> Result<Vec<String>, PluginError> {
        Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn contains(&self, plugin: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == plugin)
    }

    fn open(&self, plugin: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        let (_, factory) = self
            .entries
            .iter()
            .find(|(name, _)| name == plugin)
            .ok_or_else(|| PluginError::NotFound { plugin: plugin.to_string() })?;
        factory()
    }
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field("name", &self.name)
            .field("plugins", &self.entries.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}
