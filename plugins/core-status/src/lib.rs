//! Plugin status reporting.
//!
//! Defines the [`StatusReporter`] capability and a plain-text implementation.
//! The host registers this crate as a built-in plugin; the same crate also
//! builds as a plugin library exporting `kiln_plugin_entry`.
use std::fmt::Write;

use kiln_core::component::{Component, ComponentRegistry, Implementation};
use kiln_core::plugin_system::{Plugin, PluginError, PluginInfo, PluginMetadata, PluginStatus};
use kiln_core::upcast;
use log::info;

/// Name the host registers this plugin under
pub const PLUGIN_NAME: &str = "core-status";

/// Renders a status report for a set of plugins
pub trait StatusReporter: Send + Sync {
    fn render(&self, plugins: &[&PluginInfo], order: &[String]) -> String;
}

/// One `name: status` line per plugin, sorted by name, then the load order
#[derive(Debug, Default)]
pub struct PlainReporter;

impl Component for PlainReporter {}

impl StatusReporter for PlainReporter {
    fn render(&self, plugins: &[&PluginInfo], order: &[String]) -> String {
        let mut sorted = plugins.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut report = String::new();
        for plugin in sorted {
            match (plugin.status(), &plugin.crash) {
                (PluginStatus::Crashed, Some(crash)) => {
                    let _ = writeln!(report, "{}: crashed ({})", plugin.name, crash_cause(crash));
                }
                (status, _) => {
                    let _ = writeln!(report, "{}: {}", plugin.name, status);
                }
            }
        }
        let _ = writeln!(report, "Load order: {}", order.join(", "));
        report
    }
}

fn crash_cause(crash: &PluginError) -> String {
    match crash {
        PluginError::Crashed { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct StatusPlugin;

impl Plugin for StatusPlugin {
    fn metadata(&self) -> Result<PluginMetadata, PluginError> {
        Ok(PluginMetadata::new("Core status")
            .with_description("Renders plugin status reports")
            .with_init(|components: &mut ComponentRegistry| {
                components.get_instance::<PlainReporter>()?;
                info!("Status reporter ready");
                Ok(())
            }))
    }

    fn register(&self, components: &mut ComponentRegistry) -> Result<(), PluginError> {
        components.mark_as_capability::<dyn StatusReporter>();
        components.register_implementation(Implementation::<PlainReporter>::new().provides(upcast!(StatusReporter)));
        Ok(())
    }
}

/// Plugin library entry point
#[unsafe(no_mangle)]
#[allow(improper_ctypes_definitions)]
pub extern "C" fn kiln_plugin_entry() -> Box<dyn Plugin> {
    Box::new(StatusPlugin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::plugin_system::{Dependency, PluginManager, StaticSource, Unsatisfied};

    fn info(name: &str) -> PluginInfo {
        let mut info = PluginInfo::failed(name, PluginError::crashed(name, "boom"));
        info.crash = None;
        info
    }

    #[test]
    fn test_render_sorts_and_describes_status() {
        let mut active = info("b");
        active.active = true;
        let inactive = info("a");
        let crashed = PluginInfo::failed(
            "c",
            PluginError::Unsatisfied(Unsatisfied {
                dependency: Dependency::plugin("z"),
            }),
        );
        let hook_failed = PluginInfo::failed("d", PluginError::crashed("d", "hook failed"));

        let report = PlainReporter.render(&[&crashed, &active, &hook_failed, &inactive], &["b".to_string()]);
        assert_eq!(
            report,
            "a: inactive\nb: active\nc: crashed (Plugin unsatisfied (z))\nd: crashed (hook failed)\nLoad order: b\n"
        );
    }

    #[test]
    fn test_plugin_provides_reporter_instance() {
        let mut manager = PluginManager::new();
        manager.add_source(StaticSource::new("builtin").with_plugin::<StatusPlugin>(PLUGIN_NAME));
        manager.load_all();

        assert_eq!(manager.get_order(), [PLUGIN_NAME.to_string()]);
        assert_eq!(manager.get_instances::<dyn StatusReporter>().len(), 1);
    }

    #[test]
    fn test_entry_point_builds_plugin() {
        let plugin = kiln_plugin_entry();
        assert_eq!(plugin.metadata().unwrap().title, "Core status");
    }
}
