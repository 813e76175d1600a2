use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use kiln_core::kernel::Result as KernelResult;
use kiln_core::kernel::constants::DEFAULT_CONFIG_FILE;
use kiln_core::LoaderConfig;

/// Kiln: discover and activate plugins
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Loader configuration file (TOML, JSON or YAML). Defaults to ./kiln.toml when present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory scanned for plugins, overriding the configuration
    #[arg(long, value_name = "DIR")]
    pub plugins: Option<PathBuf>,

    /// Search path for binary dependencies, replacing PATH
    #[arg(long, value_name = "PATH")]
    pub search_path: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every plugin the sources can provide
    Discover,
    /// Load plugins and print their status
    Load {
        /// Plugins to load with their dependencies; all discovered plugins when empty
        names: Vec<String>,
    },
}

impl CliArgs {
    /// Configuration from the file, with command-line overrides applied
    pub fn loader_config(&self) -> KernelResult<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => LoaderConfig::from_file(DEFAULT_CONFIG_FILE)?,
            None => LoaderConfig::default(),
        };
        if let Some(dir) = &self.plugins {
            config.plugin_root = dir.clone();
        }
        if let Some(path) = &self.search_path {
            config.search_path = Some(path.clone());
        }
        Ok(config)
    }

    /// Default log filter for the verbosity level; `RUST_LOG` takes precedence
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
