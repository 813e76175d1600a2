use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::component::error::ComponentError;
use crate::component::init::Component;

/// Type-erased handle stored in the instance lists; always holds an `Arc<X>`
type Stored = Box<dyn Any + Send + Sync>;

/// Converts an erased instance into the `Arc<dyn Capability>` stored for one capability
type Upcast = Arc<dyn Fn(&Arc<dyn Any + Send + Sync>) -> Option<Stored> + Send + Sync>;

/// Identity of a component or capability type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Clone)]
struct Binding {
    capability: ComponentType,
    upcast: Upcast,
}

/// Declaration of the capabilities a component type provides.
///
/// The list plays the role of the type's ancestry: capabilities are walked
/// in the order given, and a component that provides a capability extending
/// another should list both.
pub struct Implementation<T> {
    bindings: Vec<Binding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> Implementation<T> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare that `T` provides capability `C`; see [`upcast!`](crate::upcast).
    pub fn provides<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let erased: Upcast = Arc::new(move |instance: &Arc<dyn Any + Send + Sync>| {
            instance
                .clone()
                .downcast::<T>()
                .ok()
                .map(|concrete| Box::new(upcast(concrete)) as Stored)
        });
        self.bindings.push(Binding {
            capability: ComponentType::of::<C>(),
            upcast: erased,
        });
        self
    }

    /// Declared capabilities, marked or not
    pub fn capabilities(&self) -> Vec<ComponentType> {
        self.bindings.iter().map(|b| b.capability).collect()
    }
}

impl<T: Component> Default for Implementation<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of capabilities, their implementations and live instances
#[derive(Default)]
pub struct ComponentRegistry {
    /// Types marked as capabilities
    capabilities: HashMap<TypeId, ComponentType>,
    /// Capability -> implementing types, in registration order
    implementations: HashMap<TypeId, Vec<ComponentType>>,
    /// Implementing type -> capabilities it was registered under
    bindings: HashMap<TypeId, Vec<Binding>>,
    /// Capability or concrete type -> live instances
    instances: HashMap<TypeId, Vec<Stored>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `C` as a capability that can be queried. Idempotent.
    pub fn mark_as_capability<C: ?Sized + 'static>(&mut self) {
        let capability = ComponentType::of::<C>();
        self.capabilities.entry(capability.id).or_insert_with(|| {
            debug!("Registered capability {}", capability);
            capability
        });
    }

    /// Alias of [`mark_as_capability`](Self::mark_as_capability)
    pub fn register_interface<C: ?Sized + 'static>(&mut self) {
        self.mark_as_capability::<C>();
    }

    pub fn is_capability<C: ?Sized + 'static>(&self) -> bool {
        self.capabilities.contains_key(&TypeId::of::<C>())
    }

    /// Register `T` under every declared capability that is already marked.
    ///
    /// Returns the capabilities `T` was recorded as satisfying. Instances
    /// created before this call are not re-published.
    pub fn register_implementation<T: Component>(&mut self, implementation: Implementation<T>) -> Vec<ComponentType> {
        let component = ComponentType::of::<T>();
        let mut satisfied = Vec::new();

        for binding in implementation.bindings {
            if !self.capabilities.contains_key(&binding.capability.id) {
                debug!(
                    "{} declares {} which is not a registered capability, skipping",
                    component, binding.capability
                );
                continue;
            }
            self.implementations
                .entry(binding.capability.id)
                .or_default()
                .push(component);
            satisfied.push(binding);
        }

        let capabilities = satisfied.iter().map(|b| b.capability).collect();
        self.bindings.insert(component.id, satisfied);
        capabilities
    }

    /// Capabilities `T` was registered as satisfying
    pub fn capabilities_of<T: ?Sized + 'static>(&self) -> Vec<ComponentType> {
        self.bindings
            .get(&TypeId::of::<T>())
            .map(|bindings| bindings.iter().map(|b| b.capability).collect())
            .unwrap_or_default()
    }

    /// Types registered as implementing `C`, in registration order
    pub fn get_implementations<C: ?Sized + 'static>(&self) -> &[ComponentType] {
        self.implementations
            .get(&TypeId::of::<C>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Run `value`'s init chain and publish it under its capabilities and its own type.
    pub fn instantiate<T: Component>(&mut self, mut value: T) -> Result<Arc<T>, ComponentError> {
        T::init_chain().run(&mut value, self)?;
        let instance = Arc::new(value);
        self.publish(Arc::clone(&instance));
        debug!("Instantiated {}", type_name::<T>());
        Ok(instance)
    }

    pub fn instantiate_default<T: Component + Default>(&mut self) -> Result<Arc<T>, ComponentError> {
        self.instantiate(T::default())
    }

    /// First live instance of `T`, building one with `T::default()` if none exists.
    pub fn get_instance<T: Component + Default>(&mut self) -> Result<Arc<T>, ComponentError> {
        match self.first_instance::<T>() {
            Some(instance) => Ok(instance),
            None => self.instantiate_default::<T>(),
        }
    }

    /// First live instance of a concrete type or capability, without building one
    pub fn first_instance<X: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<X>> {
        self.instances
            .get(&TypeId::of::<X>())
            .and_then(|list| list.first())
            .and_then(|stored| (**stored).downcast_ref::<Arc<X>>().cloned())
    }

    /// All live instances of a concrete type or capability, oldest first
    pub fn get_instances<X: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<X>> {
        self.instances
            .get(&TypeId::of::<X>())
            .map(|list| {
                list.iter()
                    .filter_map(|stored| (**stored).downcast_ref::<Arc<X>>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop every registration and instance
    pub fn clear(&mut self) {
        self.capabilities.clear();
        self.implementations.clear();
        self.bindings.clear();
        self.instances.clear();
    }

    fn publish<T: Component>(&mut self, instance: Arc<T>) {
        let erased: Arc<dyn Any + Send + Sync> = instance.clone();
        if let Some(bindings) = self.bindings.get(&TypeId::of::<T>()) {
            for binding in bindings {
                if let Some(stored) = (binding.upcast)(&erased) {
                    self.instances
                        .entry(binding.capability.id)
                        .or_default()
                        .push(stored);
                }
            }
        }
        self.instances
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(instance));
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("capabilities", &self.capabilities.values().map(|c| c.name).collect::<Vec<_>>())
            .field("implemented_capabilities", &self.implementations.len())
            .field("instance_lists", &self.instances.len())
            .finish()
    }
}
