use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::kernel::constants;
use crate::kernel::error::{Error, Result};

/// Serialisation of loader config files and plugin manifests, picked by extension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// `.json`, always compiled in
    Json,
    /// `.yaml` or `.yml`, behind the `yaml-config` feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// `.toml`, behind the `toml-config` feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Extension used when looking for `plugin.<ext>` in a plugin directory
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Format of a config or manifest path, matched case-insensitively; `None` for anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Every format compiled into this build, in lookup preference order.
    pub fn all() -> Vec<ConfigFormat> {
        let mut formats = Vec::new();
        #[cfg(feature = "toml-config")]
        formats.push(ConfigFormat::Toml);
        formats.push(ConfigFormat::Json);
        #[cfg(feature = "yaml-config")]
        formats.push(ConfigFormat::Yaml);
        formats
    }

    /// Deserialize any serde type from `data` in this format.
    ///
    /// Errors are returned as plain messages so callers can attach the path
    /// they were reading.
    pub fn deserialize<T: for<'de> Deserialize<'de>>(&self, data: &str) -> std::result::Result<T, String> {
        match self {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| format!("Failed to deserialize from JSON: {}", e))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| format!("Failed to deserialize from YAML: {}", e))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| format!("Failed to deserialize from TOML: {}", e)),
        }
    }
}

/// Settings used to build a [`PluginManager`](crate::plugin_system::PluginManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory scanned for plugin sub-directories
    pub plugin_root: PathBuf,
    /// Replaces `PATH` when resolving binary dependencies
    pub search_path: Option<String>,
    /// Module names treated as already loaded
    pub modules: Vec<String>,
    /// Extra directories searched when resolving module dependencies
    pub module_dirs: Vec<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            plugin_root: PathBuf::from(constants::DEFAULT_PLUGINS_DIR),
            search_path: None,
            modules: Vec::new(),
            module_dirs: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from a string in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> std::result::Result<Self, String> {
        format.deserialize(data)
    }

    /// Load a configuration file, picking the format from its extension.
    ///
    /// A relative `plugin_root` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedConfigFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path).map_err(|e| Error::io(e, "read_config", path))?;

        let mut config = Self::parse(&content, format).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        if config.plugin_root.is_relative() {
            if let Some(base) = path.parent() {
                config.plugin_root = base.join(&config.plugin_root);
            }
        }
        Ok(config)
    }

    /// The search path binary dependencies are resolved against
    pub fn search_path_os(&self) -> Option<OsString> {
        self.search_path.as_ref().map(OsString::from)
    }
}
