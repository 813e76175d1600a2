use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_manifest(root: &Path, name: &str, manifest: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("plugin.toml"), manifest).unwrap();
}

/// A: no deps, B: needs A, C: needs the missing plugin Z
fn sample_plugins() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    write_manifest(root.path(), "A", "title = \"A\"\n");
    write_manifest(
        root.path(),
        "B",
        "title = \"B\"\n[[dependencies]]\nkind = \"plugin\"\nname = \"A\"\n",
    );
    write_manifest(
        root.path(),
        "C",
        "title = \"C\"\n[[dependencies]]\nkind = \"plugin\"\nname = \"Z\"\n",
    );
    root
}

#[test]
fn test_discover_lists_builtin_and_directory_plugins() -> Result<(), Box<dyn std::error::Error>> {
    let plugins = sample_plugins();
    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--plugins").arg(plugins.path()).arg("discover");

    cmd.assert()
        .success()
        .stdout("core-status\nA\nB\nC\n");
    Ok(())
}

#[test]
fn test_load_all_reports_status() -> Result<(), Box<dyn std::error::Error>> {
    let plugins = sample_plugins();
    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--plugins").arg(plugins.path()).arg("load");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A: active"))
        .stdout(predicate::str::contains("B: active"))
        .stdout(predicate::str::contains("C: crashed (Plugin unsatisfied (Z))"))
        .stdout(predicate::str::contains("core-status: active"))
        .stdout(predicate::str::contains("Load order: core-status, A, B\n"));
    Ok(())
}

#[test]
fn test_load_named_plugin_pulls_in_dependency() -> Result<(), Box<dyn std::error::Error>> {
    let plugins = sample_plugins();
    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--plugins").arg(plugins.path()).args(["load", "B"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Load order: core-status, A, B\n"))
        .stdout(predicate::str::contains("C:").not());
    Ok(())
}

#[test]
fn test_missing_binary_dependency_crashes_plugin() -> Result<(), Box<dyn std::error::Error>> {
    let plugins = tempfile::tempdir()?;
    let empty_path = tempfile::tempdir()?;
    write_manifest(
        plugins.path(),
        "D",
        "title = \"D\"\n[[dependencies]]\nkind = \"binary\"\nname = \"nonexistent-tool-xyz\"\n",
    );

    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--plugins")
        .arg(plugins.path())
        .arg("--search-path")
        .arg(empty_path.path())
        .arg("load");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "D: crashed (Application binary unsatisfied (nonexistent-tool-xyz))",
        ))
        .stdout(predicate::str::contains("Load order: core-status\n"));
    Ok(())
}

#[test]
fn test_config_file_sets_plugin_root() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempfile::tempdir()?;
    write_manifest(&workspace.path().join("ext"), "A", "title = \"A\"\n");
    let config = workspace.path().join("kiln.json");
    fs::write(&config, r#"{"plugin_root": "ext"}"#)?;

    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--config").arg(&config).arg("discover");

    cmd.assert()
        .success()
        .stdout("core-status\nA\n");
    Ok(())
}

#[test]
fn test_unreadable_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.arg("--config")
        .arg(workspace.path().join("absent.toml"))
        .arg("discover");

    cmd.assert().failure().stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn test_missing_plugin_root_still_serves_builtins() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("kiln")?;
    cmd.current_dir(workspace.path())
        .arg("--plugins")
        .arg(workspace.path().join("nowhere"))
        .arg("load");

    cmd.assert()
        .success()
        .stdout("core-status: active\nLoad order: core-status\n");
    Ok(())
}
