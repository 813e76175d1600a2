use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::component::error::ComponentError;
use crate::component::registry::ComponentRegistry;

/// Boxed error returned by init layers and activation hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single init layer
pub type InitResult = Result<(), BoxError>;

type Step<T> = Arc<dyn Fn(&mut T, &mut ComponentRegistry) -> InitResult + Send + Sync>;

/// Identity of a declared layer, shared by every chain that inherits it
struct LayerId;

struct Layer<T> {
    label: &'static str,
    id: Arc<LayerId>,
    step: Step<T>,
}

impl<T> Clone for Layer<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            id: Arc::clone(&self.id),
            step: Arc::clone(&self.step),
        }
    }
}

/// A type that can be built by the [`ComponentRegistry`].
pub trait Component: Any + Send + Sync + Sized {
    /// Setup layers run by [`ComponentRegistry::instantiate`], most basic first.
    fn init_chain() -> InitChain<Self> {
        InitChain::new()
    }
}

/// Ordered list of labelled initialization layers for a component.
///
/// Layers run base-first. Every call to [`layer`](Self::layer) declares a
/// new layer, so a component overriding a base layer under the same label
/// still runs its own step after the base one. A layer reached twice through
/// copies of one chain (see [`extend`](Self::extend)) runs only at its first
/// position.
pub struct InitChain<T> {
    layers: Vec<Layer<T>>,
}

impl<T: 'static> InitChain<T> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer
    pub fn layer<F>(mut self, label: &'static str, step: F) -> Self
    where
        F: Fn(&mut T, &mut ComponentRegistry) -> InitResult + Send + Sync + 'static,
    {
        self.layers.push(Layer {
            label,
            id: Arc::new(LayerId),
            step: Arc::new(step),
        });
        self
    }

    /// Append the layers of `other` after this chain's own
    pub fn extend(mut self, other: InitChain<T>) -> Self {
        self.layers.extend(other.layers);
        self
    }

    /// Start a chain from the layers of an embedded base component.
    ///
    /// `project` selects the base value inside `T`; every base layer keeps its
    /// label and identity.
    pub fn inherit<B: 'static>(base: InitChain<B>, project: fn(&mut T) -> &mut B) -> Self {
        let layers = base
            .layers
            .into_iter()
            .map(|Layer { label, id, step }| {
                let wrapped: Step<T> = Arc::new(move |target: &mut T, registry: &mut ComponentRegistry| {
                    (*step)(project(target), registry)
                });
                Layer { label, id, step: wrapped }
            })
            .collect();
        Self { layers }
    }

    /// Labels in declaration order, duplicates included
    pub fn labels(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.label).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub(crate) fn run(&self, target: &mut T, registry: &mut ComponentRegistry) -> Result<(), ComponentError> {
        let mut executed: Vec<&Arc<LayerId>> = Vec::new();
        for layer in &self.layers {
            if executed.iter().any(|id| Arc::ptr_eq(id, &layer.id)) {
                trace!("Skipping repeated init layer '{}' of {}", layer.label, type_name::<T>());
                continue;
            }
            executed.push(&layer.id);
            (*layer.step)(target, registry).map_err(|e| ComponentError::InitFailed {
                component: type_name::<T>(),
                layer: layer.label,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

impl<T> Clone for InitChain<T> {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
        }
    }
}

impl<T: 'static> Default for InitChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InitChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| layer.label))
            .finish()
    }
}
