mod dependency_tests;

use std::sync::{Arc, Mutex};

use crate::plugin_system::{Dependency, Plugin, PluginError, PluginMetadata, StaticSource};

/// Plugin serving fixed metadata, optionally logging its shutdown
struct TestPlugin {
    metadata: PluginMetadata,
    shutdown_log: Option<Arc<Mutex<Vec<String>>>>,
}

impl Plugin for TestPlugin {
    fn metadata(&self) -> Result<PluginMetadata, PluginError> {
        Ok(self.metadata.clone())
    }

    fn shutdown(&self) -> Result<(), PluginError> {
        if let Some(log) = &self.shutdown_log {
            log.lock().unwrap().push(self.metadata.title.clone());
        }
        Ok(())
    }
}

/// Register `name` with `metadata` on `source`
fn add(source: &mut StaticSource, name: &str, metadata: PluginMetadata) {
    add_logged(source, name, metadata, None);
}

fn add_logged(
    source: &mut StaticSource,
    name: &str,
    metadata: PluginMetadata,
    shutdown_log: Option<Arc<Mutex<Vec<String>>>>,
) {
    source.register_factory(name, move || {
        Ok(Arc::new(TestPlugin {
            metadata: metadata.clone(),
            shutdown_log: shutdown_log.clone(),
        }) as Arc<dyn Plugin>)
    });
}

/// Metadata titled `name` depending on the given plugins
fn depends_on(name: &str, plugins: &[&str]) -> PluginMetadata {
    plugins
        .iter()
        .fold(PluginMetadata::new(name), |metadata, dep| metadata.depends_on(Dependency::plugin(*dep)))
}
