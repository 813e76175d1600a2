//! Plugins laid out as sub-directories of a filesystem root.
//!
//! ```text
//! plugins/
//!   greeter/
//!     plugin.toml        # title, dependencies, optional api/library
//!     libgreeter.so      # optional, named by `library`
//! ```
use std::fmt;
use std::fs;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::sync::Arc;

use log::debug;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::component::ComponentRegistry;
use crate::kernel::config::ConfigFormat;
use crate::kernel::constants::{API_VERSION, MANIFEST_STEM};
use crate::plugin_system::dependency::Dependency;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::library::LibraryPlugin;
use crate::plugin_system::source::PluginSource;
use crate::plugin_system::traits::{Plugin, PluginMetadata};
use crate::utils::fs::list_candidate_dirs;

/// On-disk description of a directory plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Semver requirement on the host API version
    #[serde(default)]
    pub api: Option<String>,
    /// Shared library relative to the plugin directory
    #[serde(default)]
    pub library: Option<String>,
}

impl PluginManifest {
    /// Fail unless the host API version satisfies `api`
    pub fn check_api(&self, plugin: &str, path: &Path) -> Result<(), PluginError> {
        let Some(required) = &self.api else {
            return Ok(());
        };
        let requirement = VersionReq::parse(required).map_err(|e| PluginError::Manifest {
            path: path.to_path_buf(),
            message: format!("invalid api requirement '{}': {}", required, e),
        })?;
        let host = Version::parse(API_VERSION).map_err(|e| PluginError::Manifest {
            path: path.to_path_buf(),
            message: format!("invalid host api version '{}': {}", API_VERSION, e),
        })?;
        if requirement.matches(&host) {
            Ok(())
        } else {
            Err(PluginError::IncompatibleApi {
                plugin: plugin.to_string(),
                required: required.clone(),
                actual: API_VERSION.to_string(),
            })
        }
    }
}

/// Scans `root` for plugin directories
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The plugin's directory, if one exists for `plugin`
    pub fn resolve_path(&self, plugin: &str) -> Option<PathBuf> {
        if !is_plain_name(plugin) {
            return None;
        }
        let dir = self.root.join(plugin);
        dir.is_dir().then_some(dir)
    }

    /// First manifest found in `dir`, with its format
    pub fn manifest_path(dir: &Path) -> Option<(PathBuf, ConfigFormat)> {
        ConfigFormat::all().into_iter().find_map(|format| {
            let mut extensions = vec![format.extension()];
            if format.extension() == "yaml" {
                extensions.push("yml");
            }
            extensions
                .into_iter()
                .map(|ext| dir.join(format!("{}.{}", MANIFEST_STEM, ext)))
                .find(|candidate| candidate.is_file())
                .map(|candidate| (candidate, format))
        })
    }

    pub fn read_manifest(&self, plugin: &str) -> Result<(PathBuf, PluginManifest), PluginError> {
        let dir = self
            .resolve_path(plugin)
            .ok_or_else(|| PluginError::NotFound { plugin: plugin.to_string() })?;
        let (path, format) = Self::manifest_path(&dir).ok_or_else(|| PluginError::Manifest {
            path: dir.clone(),
            message: "no manifest found".to_string(),
        })?;
        let content = fs::read_to_string(&path).map_err(|e| PluginError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let manifest = format
            .deserialize::<PluginManifest>(&content)
            .map_err(|message| PluginError::Manifest { path: path.clone(), message })?;
        Ok((path, manifest))
    }

    fn open_library(dir: &Path, library: &str) -> Result<LibraryPlugin, PluginError> {
        let relative = Path::new(library);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, PathComponent::Normal(_) | PathComponent::CurDir));
        if escapes {
            return Err(PluginError::Library {
                path: relative.to_path_buf(),
                message: "library path must stay inside the plugin directory".to_string(),
            });
        }
        LibraryPlugin::open(&dir.join(relative))
    }
}

impl PluginSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    fn discover(&self) -> Result<Vec<String>, PluginError> {
        list_candidate_dirs(&self.root).map_err(|e| PluginError::Discovery {
            source_name: self.root.display().to_string(),
            message: e.to_string(),
        })
    }

    fn contains(&self, plugin: &str) -> bool {
        self.resolve_path(plugin).is_some()
    }

    fn open(&self, plugin: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        let (path, manifest) = self.read_manifest(plugin)?;
        manifest.check_api(plugin, &path)?;
        debug!("Read manifest {} for plugin {}", path.display(), plugin);

        let library = match (&manifest.library, path.parent()) {
            (Some(library), Some(dir)) => Some(Self::open_library(dir, library)?),
            _ => None,
        };
        Ok(Arc::new(ManifestPlugin { manifest, library }))
    }
}

/// Directory names that can't be mistaken for paths or hidden entries
fn is_plain_name(plugin: &str) -> bool {
    !plugin.is_empty() && !plugin.contains('.') && !plugin.contains(['/', '\\'])
}

/// A directory plugin: manifest metadata, optionally backed by a library
struct ManifestPlugin {
    manifest: PluginManifest,
    library: Option<LibraryPlugin>,
}

impl Plugin for ManifestPlugin {
    fn metadata(&self) -> Result<PluginMetadata, PluginError> {
        let mut metadata = PluginMetadata::new(self.manifest.title.clone());
        metadata.description = self.manifest.description.clone();
        metadata.dependencies = self.manifest.dependencies.clone();

        if let Some(library) = &self.library {
            let provided = library.metadata()?;
            // Manifest dependencies are checked before the library's own
            metadata.dependencies.extend(provided.dependencies);
            metadata.init = provided.init;
            if metadata.description.is_none() {
                metadata.description = provided.description;
            }
        }
        Ok(metadata)
    }

    fn register(&self, components: &mut ComponentRegistry) -> Result<(), PluginError> {
        match &self.library {
            Some(library) => library.register(components),
            None => Ok(()),
        }
    }

    fn shutdown(&self) -> Result<(), PluginError> {
        match &self.library {
            Some(library) => library.shutdown(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ManifestPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestPlugin")
            .field("manifest", &self.manifest)
            .field("library", &self.library)
            .finish()
    }
}
