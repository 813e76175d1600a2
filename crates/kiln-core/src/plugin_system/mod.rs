//! # Kiln Core Plugin System
//!
//! Discovers plugins, checks their declared dependencies and activates them,
//! loading plugin dependencies first.
//!
//! ## Key Components
//!
//! - **[`Plugin`]**: a loaded unit. It registers components at load time and
//!   declares [`PluginMetadata`] with dependencies and an activation hook.
//! - **[`Dependency`]**: a module, plugin or binary prerequisite, checked
//!   against the [`Environment`].
//! - **[`PluginSource`]**: where plugins come from. [`StaticSource`] holds
//!   compiled-in plugins and [`DirectorySource`] reads plugin directories
//!   with a manifest and an optional [`LibraryPlugin`].
//! - **[`PluginLoader`]**: the plugin table and load order. `load` activates a
//!   single plugin, `load_recursive` chases plugin dependencies and
//!   `load_all` sweeps every discovered plugin.
//! - **[`PluginManager`]**: owns the loader and the component registry.
//! - **Error Handling**: failures are recorded per plugin as [`PluginError`]
//!   in [`PluginInfo::crash`]; see the `error` submodule.
pub mod dependency;
pub mod directory;
pub mod environment;
pub mod error;
pub mod info;
pub mod library;
pub mod loader;
pub mod manager;
pub mod resolver;
pub mod source;
pub mod traits;

pub use dependency::{Dependency, DependencyKind, Unsatisfied};
pub use directory::{DirectorySource, PluginManifest};
pub use environment::{Environment, LoadOrder, ModuleRegistry};
pub use error::PluginError;
pub use info::{PluginInfo, PluginStatus};
pub use library::{LibraryPlugin, PluginEntryFn};
pub use loader::{LoadOutcome, PluginLoader};
pub use manager::PluginManager;
pub use source::{PluginSource, StaticSource};
pub use traits::{HookResult, InitHook, Plugin, PluginMetadata};

#[cfg(test)]
mod tests;
