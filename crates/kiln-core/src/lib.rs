//! # Kiln Core
//!
//! A plugin loader with declared dependencies and a capability registry.
//!
//! Plugins come from [`PluginSource`](plugin_system::PluginSource)s, declare
//! module, plugin and binary [`Dependency`]s, and are activated once those
//! hold, with plugin dependencies loaded first. Plugins publish component
//! implementations and instances through the [`ComponentRegistry`].
pub mod component;
pub mod kernel;
pub mod plugin_system;
pub mod utils;

// Re-export key public types/traits for easier use by the binary and plugins
pub use component::{Component, ComponentRegistry, Implementation, InitChain};
pub use kernel::config::LoaderConfig;
pub use kernel::error::Error as KernelError;
pub use plugin_system::{
    Dependency, DirectorySource, LoadOutcome, Plugin, PluginError, PluginInfo, PluginManager, PluginMetadata,
    PluginStatus, StaticSource,
};
