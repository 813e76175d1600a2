//! Error type for component instantiation.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    /// A layer of the component's init chain returned an error
    #[error("Initialization of component '{component}' failed in layer '{layer}': {message}")]
    InitFailed {
        component: &'static str,
        layer: &'static str,
        message: String,
    },
}
