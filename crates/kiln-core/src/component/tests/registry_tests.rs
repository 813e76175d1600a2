use std::sync::Arc;

use crate::component::{Component, ComponentRegistry, ComponentType, Implementation};
use crate::upcast;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

trait Loud: Send + Sync {
    fn shout(&self) -> String;
}

#[derive(Default)]
struct English;
impl Component for English {}
impl Greeter for English {
    fn greet(&self) -> String {
        "hello".into()
    }
}
impl Loud for English {
    fn shout(&self) -> String {
        "HELLO".into()
    }
}

#[derive(Default)]
struct French;
impl Component for French {}
impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".into()
    }
}

#[derive(Default)]
struct Unregistered;
impl Component for Unregistered {}
impl Greeter for Unregistered {
    fn greet(&self) -> String {
        "...".into()
    }
}

#[test]
fn test_mark_as_capability_is_idempotent() {
    let mut registry = ComponentRegistry::new();
    assert!(!registry.is_capability::<dyn Greeter>());
    registry.mark_as_capability::<dyn Greeter>();
    registry.register_interface::<dyn Greeter>();
    assert!(registry.is_capability::<dyn Greeter>());
    assert!(registry.get_implementations::<dyn Greeter>().is_empty());
}

#[test]
fn test_reads_on_empty_registry_return_empty() {
    let registry = ComponentRegistry::new();
    assert!(registry.get_implementations::<dyn Greeter>().is_empty());
    assert!(registry.get_instances::<dyn Greeter>().is_empty());
    assert!(registry.get_instances::<English>().is_empty());
    assert!(registry.first_instance::<English>().is_none());
    assert!(registry.capabilities_of::<English>().is_empty());
}

#[test]
fn test_implementations_in_registration_order() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();

    registry.register_implementation(Implementation::<French>::new().provides(upcast!(Greeter)));
    registry.register_implementation(Implementation::<English>::new().provides(upcast!(Greeter)));

    let implementations = registry.get_implementations::<dyn Greeter>();
    assert_eq!(implementations, &[ComponentType::of::<French>(), ComponentType::of::<English>()]);
    assert!(!implementations.iter().any(|t| t.is::<Unregistered>()));
}

#[test]
fn test_duplicate_registration_is_not_deduplicated() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();
    registry.register_implementation(Implementation::<English>::new().provides(upcast!(Greeter)));
    registry.register_implementation(Implementation::<English>::new().provides(upcast!(Greeter)));

    assert_eq!(registry.get_implementations::<dyn Greeter>().len(), 2);
    assert_eq!(registry.capabilities_of::<English>(), vec![ComponentType::of::<dyn Greeter>()]);
}

#[test]
fn test_unmarked_capability_is_skipped() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();

    let implementation = Implementation::<English>::new()
        .provides(upcast!(Greeter))
        .provides(upcast!(Loud));
    assert_eq!(implementation.capabilities().len(), 2);

    let satisfied = registry.register_implementation(implementation);
    assert_eq!(satisfied, vec![ComponentType::of::<dyn Greeter>()]);
    assert!(registry.get_implementations::<dyn Loud>().is_empty());
}

#[test]
fn test_instantiate_publishes_under_capabilities_and_type() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();
    registry.mark_as_capability::<dyn Loud>();
    registry.register_implementation(
        Implementation::<English>::new()
            .provides(upcast!(Greeter))
            .provides(upcast!(Loud)),
    );
    registry.register_implementation(Implementation::<French>::new().provides(upcast!(Greeter)));

    let english = registry.instantiate(English).unwrap();
    registry.instantiate(French).unwrap();

    let greetings: Vec<String> = registry
        .get_instances::<dyn Greeter>()
        .iter()
        .map(|g| g.greet())
        .collect();
    assert_eq!(greetings, vec!["hello", "bonjour"]);

    let loud = registry.get_instances::<dyn Loud>();
    assert_eq!(loud.len(), 1);
    assert_eq!(loud[0].shout(), "HELLO");

    let concrete = registry.get_instances::<English>();
    assert_eq!(concrete.len(), 1);
    assert!(Arc::ptr_eq(&concrete[0], &english));
}

#[test]
fn test_instance_created_before_registration_is_not_discoverable() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();

    registry.instantiate(French).unwrap();
    registry.register_implementation(Implementation::<French>::new().provides(upcast!(Greeter)));

    assert!(registry.get_instances::<dyn Greeter>().is_empty());
    assert_eq!(registry.get_instances::<French>().len(), 1);
}

#[test]
fn test_get_instance_is_lazy_and_reuses_first() {
    let mut registry = ComponentRegistry::new();
    assert!(registry.first_instance::<English>().is_none());

    let first = registry.get_instance::<English>().unwrap();
    let second = registry.get_instance::<English>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.get_instances::<English>().len(), 1);

    registry.instantiate(English).unwrap();
    let again = registry.get_instance::<English>().unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(registry.get_instances::<English>().len(), 2);
}

#[test]
fn test_clear_drops_everything() {
    let mut registry = ComponentRegistry::new();
    registry.mark_as_capability::<dyn Greeter>();
    registry.register_implementation(Implementation::<English>::new().provides(upcast!(Greeter)));
    registry.instantiate(English).unwrap();

    registry.clear();
    assert!(!registry.is_capability::<dyn Greeter>());
    assert!(registry.get_implementations::<dyn Greeter>().is_empty());
    assert!(registry.get_instances::<dyn Greeter>().is_empty());
}
