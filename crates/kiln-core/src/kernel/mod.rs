//! # Kiln Core Kernel
//!
//! Process-level plumbing shared by the rest of `kiln-core`.
//!
//! - **Constants**: names, default paths and the host API version, in the
//!   `constants` submodule.
//! - **Configuration**: [`LoaderConfig`](config::LoaderConfig) and format
//!   detection ([`ConfigFormat`](config::ConfigFormat)) in the `config` submodule.
//! - **Error Handling**: the crate-level [`Error`](error::Error) and a `Result`
//!   alias in the `error` submodule.
pub mod config;
pub mod constants;
pub mod error;

pub use config::{ConfigFormat, LoaderConfig};
pub use error::{Error, Result};
