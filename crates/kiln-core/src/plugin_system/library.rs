//! Plugins shipped as shared libraries.
//!
//! A plugin library exports [`PLUGIN_ENTRY_SYMBOL`] with the signature
//! [`PluginEntryFn`]. Host and plugin must be built with the same compiler
//! and the same `kiln-core`, since trait objects cross the boundary.
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::Library;
use log::debug;

use crate::component::ComponentRegistry;
use crate::kernel::constants::PLUGIN_ENTRY_SYMBOL;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::traits::{Plugin, PluginMetadata};
use crate::utils::catch_panic;

/// Signature of the exported plugin constructor
#[allow(improper_ctypes_definitions)]
pub type PluginEntryFn = unsafe extern "C" fn() -> Box<dyn Plugin>;

/// A plugin constructed by a dynamically loaded library.
///
/// Field order matters: the plugin is dropped before the library that
/// holds its code is unloaded.
pub struct LibraryPlugin {
    plugin: Box<dyn Plugin>,
    path: PathBuf,
    _library: Library,
}

impl LibraryPlugin {
    pub fn open(path: &Path) -> Result<Self, PluginError> {
        let library_error = |message: String| PluginError::Library {
            path: path.to_path_buf(),
            message,
        };

        debug!("Opening plugin library {}", path.display());
        // SAFETY: loading a library runs its initialisers. Plugin libraries
        // are trusted code built against this crate.
        let library = unsafe { Library::new(path) }.map_err(|e| library_error(e.to_string()))?;

        // SAFETY: the symbol is declared with `PluginEntryFn`'s signature by
        // plugins exporting it; the pointer stays valid while `library` lives.
        let entry: PluginEntryFn = unsafe { library.get::<PluginEntryFn>(PLUGIN_ENTRY_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| library_error(format!("missing entry point '{}': {}", PLUGIN_ENTRY_SYMBOL, e)))?;

        // SAFETY: see above
        let plugin = catch_panic(|| unsafe { entry() })
            .map_err(|panic| library_error(format!("panic in entry point: {}", panic)))?;

        Ok(Self {
            plugin,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Plugin for LibraryPlugin {
    fn metadata(&self) -> Result<PluginMetadata, PluginError> {
        self.plugin.metadata()
    }

    fn register(&self, components: &mut ComponentRegistry) -> Result<(), PluginError> {
        self.plugin.register(components)
    }

    fn shutdown(&self) -> Result<(), PluginError> {
        self.plugin.shutdown()
    }
}

impl fmt::Debug for LibraryPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryPlugin").field("path", &self.path).finish()
    }
}
