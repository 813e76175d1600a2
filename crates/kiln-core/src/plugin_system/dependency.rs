use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin_system::environment::Environment;
use crate::utils::fs::find_executable;

/// Kind of prerequisite a [`Dependency`] names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Module,
    Plugin,
    Binary,
}

impl DependencyKind {
    pub fn description(&self) -> &'static str {
        match self {
            DependencyKind::Module => "Loadable module",
            DependencyKind::Plugin => "Plugin",
            DependencyKind::Binary => "Application binary",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A prerequisite that must hold before a plugin may activate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dependency {
    /// A shared library, already loaded or loadable
    Module { name: String },
    /// Another plugin, by name; only successful activation counts
    Plugin { name: String },
    /// An executable on the search path
    Binary { name: String },
}

/// The dependency that made a check fail
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} unsatisfied ({})", .dependency.description(), .dependency.name())]
pub struct Unsatisfied {
    pub dependency: Dependency,
}

impl Unsatisfied {
    /// Human-readable reason: the name of the missing thing
    pub fn reason(&self) -> &str {
        self.dependency.name()
    }

    /// Name of the missing plugin, if a plugin dependency failed
    pub fn plugin_name(&self) -> Option<&str> {
        match &self.dependency {
            Dependency::Plugin { name } => Some(name),
            _ => None,
        }
    }
}

impl Dependency {
    pub fn module(name: impl Into<String>) -> Self {
        Dependency::Module { name: name.into() }
    }

    pub fn plugin(name: impl Into<String>) -> Self {
        Dependency::Plugin { name: name.into() }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Dependency::Binary { name: name.into() }
    }

    pub fn kind(&self) -> DependencyKind {
        match self {
            Dependency::Module { .. } => DependencyKind::Module,
            Dependency::Plugin { .. } => DependencyKind::Plugin,
            Dependency::Binary { .. } => DependencyKind::Binary,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Dependency::Module { name } | Dependency::Plugin { name } | Dependency::Binary { name } => name,
        }
    }

    pub fn description(&self) -> &'static str {
        self.kind().description()
    }

    /// "Plugin: core", "Application binary: git", ...
    pub fn describe(&self) -> String {
        format!("{}: {}", self.description(), self.name())
    }

    /// Whether the prerequisite holds right now.
    ///
    /// Module checks may open the library to check it; the handle is not kept.
    pub fn satisfied(&self, env: &Environment) -> bool {
        match self {
            Dependency::Module { name } => env.modules().is_loaded(name) || env.modules().can_open(name),
            Dependency::Plugin { name } => env.order().contains(name),
            Dependency::Binary { name } => find_executable(name, env.search_path()).is_some(),
        }
    }

    pub fn check(&self, env: &Environment) -> Result<(), Unsatisfied> {
        if self.satisfied(env) {
            Ok(())
        } else {
            Err(Unsatisfied { dependency: self.clone() })
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
