//! State consulted by dependency checks: the load order, the registry of
//! loaded modules and the executable search path.
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use libloading::Library;
use log::trace;

/// Names of plugins that completed activation, most recent last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOrder {
    names: Vec<String>,
}

impl LoadOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Move `name` to the end, appending it if absent
    pub fn promote(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        self.names.push(name.to_string());
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// Registry of loaded modules (shared libraries) and where to look for more
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    loaded: HashSet<String>,
    dirs: Vec<PathBuf>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&mut self, name: impl Into<String>) {
        self.loaded.insert(name.into());
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// Try opening `name` through the platform loader, then inside each
    /// module directory. The library is closed again before returning.
    pub fn can_open(&self, name: &str) -> bool {
        let mut candidates: Vec<OsString> = vec![OsString::from(name)];
        candidates.extend(self.dirs.iter().map(|dir| dir.join(name).into_os_string()));

        candidates.iter().any(|candidate| {
            // SAFETY: opening a library runs its initialisers; checking module
            // dependencies accepts that cost.
            match unsafe { Library::new(candidate) } {
                Ok(library) => {
                    drop(library);
                    true
                }
                Err(e) => {
                    trace!("Opening module {:?} failed: {}", candidate, e);
                    false
                }
            }
        })
    }
}

/// Everything a [`Dependency`](crate::plugin_system::Dependency) check reads
#[derive(Debug, Clone, Default)]
pub struct Environment {
    order: LoadOrder,
    modules: ModuleRegistry,
    search_path: Option<OsString>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> &LoadOrder {
        &self.order
    }

    pub fn order_mut(&mut self) -> &mut LoadOrder {
        &mut self.order
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Override of `PATH` for binary lookups
    pub fn search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }

    pub fn set_search_path(&mut self, path: Option<OsString>) {
        self.search_path = path;
    }
}
