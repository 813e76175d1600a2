use serde::Deserialize;

use crate::plugin_system::{Dependency, DependencyKind, Environment, PluginError, Unsatisfied};

#[derive(Debug, Deserialize)]
struct Wrapper {
    dependencies: Vec<Dependency>,
}

#[test]
fn test_descriptions_and_display() {
    let dep = Dependency::binary("git");
    assert_eq!(dep.kind(), DependencyKind::Binary);
    assert_eq!(dep.name(), "git");
    assert_eq!(dep.to_string(), "git");
    assert_eq!(dep.describe(), "Application binary: git");
    assert_eq!(Dependency::module("libz").description(), "Loadable module");
    assert_eq!(Dependency::plugin("core").description(), "Plugin");
}

#[test]
fn test_unsatisfied_message_and_reason() {
    let unsatisfied = Unsatisfied {
        dependency: Dependency::plugin("core"),
    };
    assert_eq!(unsatisfied.to_string(), "Plugin unsatisfied (core)");
    assert_eq!(unsatisfied.reason(), "core");
    assert_eq!(unsatisfied.plugin_name(), Some("core"));

    let binary = Unsatisfied {
        dependency: Dependency::binary("git"),
    };
    assert_eq!(binary.plugin_name(), None);

    // Wrapping keeps the message intact
    let err = PluginError::from(binary.clone());
    assert_eq!(err.to_string(), "Application binary unsatisfied (git)");
    assert_eq!(err.unsatisfied(), Some(&binary));
}

#[test]
fn test_deserialize_tagged_dependencies() {
    let parsed: Wrapper = serde_json::from_str(
        r#"{"dependencies": [
            {"kind": "plugin", "name": "core"},
            {"kind": "module", "name": "libz.so"},
            {"kind": "binary", "name": "git"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        parsed.dependencies,
        vec![
            Dependency::plugin("core"),
            Dependency::module("libz.so"),
            Dependency::binary("git"),
        ]
    );
}

#[test]
fn test_deserialize_rejects_unknown_kind() {
    let parsed = serde_json::from_str::<Wrapper>(r#"{"dependencies": [{"kind": "service", "name": "x"}]}"#);
    assert!(parsed.is_err());
}

#[test]
fn test_plugin_dependency_requires_load_order_membership() {
    let mut env = Environment::new();
    let dep = Dependency::plugin("core");
    assert!(!dep.satisfied(&env));

    env.order_mut().promote("core");
    assert!(dep.satisfied(&env));
    assert!(dep.check(&env).is_ok());
}

#[test]
fn test_module_dependency_satisfied_when_marked_loaded() {
    let mut env = Environment::new();
    let dep = Dependency::module("libkiln-test-module-xyz.so");
    assert_eq!(
        dep.check(&env),
        Err(Unsatisfied {
            dependency: dep.clone()
        })
    );

    env.modules_mut().mark_loaded("libkiln-test-module-xyz.so");
    assert!(dep.satisfied(&env));
}

#[test]
fn test_binary_dependency_uses_search_path() {
    let empty = tempfile::tempdir().unwrap();
    let mut env = Environment::new();
    env.set_search_path(Some(empty.path().as_os_str().to_owned()));
    assert!(!Dependency::binary("nonexistent-tool-xyz").satisfied(&env));
}

#[cfg(unix)]
#[test]
fn test_binary_dependency_found_on_search_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("kiln-fake-tool");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut env = Environment::new();
    env.set_search_path(Some(dir.path().as_os_str().to_owned()));
    assert!(Dependency::binary("kiln-fake-tool").satisfied(&env));
}

#[test]
fn test_load_order_promote_moves_to_end() {
    let mut env = Environment::new();
    let order = env.order_mut();
    order.promote("a");
    order.promote("b");
    order.promote("a");
    assert_eq!(order.as_slice(), ["b".to_string(), "a".to_string()]);
    assert_eq!(order.position("a"), Some(1));
    assert_eq!(order.len(), 2);
}
