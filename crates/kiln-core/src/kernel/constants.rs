/// Application name
pub const APP_NAME: &str = "Kiln";

/// Current API version, checked against the `api` requirement of plugin manifests
pub const API_VERSION: &str = "0.1.0";

/// Default plugins directory
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "kiln.toml";

/// File stem of a plugin manifest; the extension selects the format
pub const MANIFEST_STEM: &str = "plugin";

/// Symbol a shared-library plugin must export
pub const PLUGIN_ENTRY_SYMBOL: &str = "kiln_plugin_entry";
