mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error, warn};

use cli::{CliArgs, Commands};
use core_status::{PLUGIN_NAME as STATUS_PLUGIN, PlainReporter, StatusPlugin, StatusReporter};
use kiln_core::kernel::Result;
use kiln_core::kernel::constants::APP_NAME;
use kiln_core::plugin_system::{PluginInfo, PluginManager, StaticSource};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    if let Err(e) = env_logger::Builder::from_env(env).format_timestamp(None).try_init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
    debug!("{} starting with {:?}", APP_NAME, args);

    let config = match args.loader_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Built-in plugins are served ahead of the plugin directory
    let mut manager = PluginManager::new();
    manager.add_source(StaticSource::new("builtin").with_plugin::<StatusPlugin>(STATUS_PLUGIN));
    manager.configure(&config);

    match args.command {
        Commands::Discover => {
            for name in manager.discover() {
                println!("{}", name);
            }
        }
        Commands::Load { names } => {
            load(&mut manager, &names);
            match render_report(&mut manager) {
                Ok(report) => print!("{}", report),
                Err(e) => {
                    error!("Failed to build the status report: {}", e);
                    eprintln!("Error: {}", e);
                    manager.shutdown();
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    manager.shutdown();
    ExitCode::SUCCESS
}

fn load(manager: &mut PluginManager, names: &[String]) {
    if names.is_empty() {
        manager.load_all();
        return;
    }
    // The reporter comes from the status plugin, so it is always loaded
    let wanted = std::iter::once(STATUS_PLUGIN).chain(names.iter().map(String::as_str));
    for name in wanted {
        if let Err(unsatisfied) = manager.load_recursive(name) {
            warn!("Plugin {} not activated: {}", name, unsatisfied);
        }
    }
}

/// Renders through the newest `StatusReporter`, building a plain one if no plugin made any
fn render_report(manager: &mut PluginManager) -> Result<String> {
    let reporter: Arc<dyn StatusReporter> = match manager.get_instances::<dyn StatusReporter>().pop() {
        Some(reporter) => reporter,
        None => manager.get_instance::<PlainReporter>()?,
    };
    let plugins: Vec<&PluginInfo> = manager.get_all().values().collect();
    Ok(reporter.render(&plugins, manager.get_order()))
}
