//! # Kiln Core Components
//!
//! Capability-based discovery of component implementations.
//!
//! A *capability* is a trait-object type (for example `dyn StatusReporter`)
//! that has been marked with
//! [`ComponentRegistry::mark_as_capability`]. A *component* is a concrete
//! type implementing [`Component`]; registering it with an
//! [`Implementation`] lists every capability it provides, and
//! [`ComponentRegistry::instantiate`] builds an instance, runs its
//! [`InitChain`] and publishes it under each of those capabilities.
//!
//! - **[`registry`]**: the [`ComponentRegistry`], [`ComponentType`] and
//!   [`Implementation`] builder.
//! - **[`init`]**: the [`Component`] trait and layered [`InitChain`].
//! - **[`error`]**: [`ComponentError`](error::ComponentError).
pub mod error;
pub mod init;
pub mod registry;

pub use error::ComponentError;
pub use init::{BoxError, Component, InitChain, InitResult};
pub use registry::{ComponentRegistry, ComponentType, Implementation};

/// Builds the upcast function passed to [`Implementation::provides`].
///
/// ```ignore
/// Implementation::<PlainReporter>::new().provides(upcast!(StatusReporter))
/// ```
#[macro_export]
macro_rules! upcast {
    ($capability:path) => {
        |instance| -> ::std::sync::Arc<dyn $capability> { instance }
    };
}

#[cfg(test)]
mod tests;
