//! Integration tests for the `hatch` binary.

use std::{fs, path::Path};

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// `hatch` isolated from the user's config and templates.
fn hatch(home: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("hatch");
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("HATCH_TEMPLATES__LOCAL_PATH", TEMPLATES)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    hatch(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Twitch extension"))
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--view"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    hatch(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_shows_bundled_template() {
    let temp = TempDir::new().unwrap();
    hatch(temp.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("template-plain"));
}

#[test]
fn test_list_json_has_templates_and_views() {
    let temp = TempDir::new().unwrap();
    let out = hatch(temp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let templates = listing["templates"].as_array().unwrap();
    assert!(templates.iter().any(|t| t["id"] == "template-plain"));
    assert_eq!(templates[0]["name"], "Vanilla JavaScript");
    let views: Vec<&str> = listing["views"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        views,
        vec!["overlay", "component", "panel", "mobile", "live_config"]
    );
}

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    hatch(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hatch"));
}

#[test]
fn test_init_then_config_get() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("hatch.toml");

    hatch(temp.path())
        .args(["init", "--config"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.is_file());

    hatch(temp.path())
        .args(["config", "get", "installer.program", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("npm"));
}

#[test]
fn test_env_overrides_config() {
    let temp = TempDir::new().unwrap();
    hatch(temp.path())
        .env("HATCH_INSTALLER__PROGRAM", "pnpm")
        .args(["config", "get", "installer.program"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pnpm"));
}

#[cfg(unix)]
#[test]
fn test_generates_project_with_presets() {
    let temp = TempDir::new().unwrap();

    hatch(temp.path())
        .args([
            "my-ext",
            "--template",
            "template-plain",
            "--view",
            "mobile",
            "--view",
            "panel",
            "--installer",
            "true",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating a new Twitch Extension"))
        .stdout(predicate::str::contains("Success! Created my-ext"));

    let app = temp.path().join("my-ext");
    assert!(app.join("package.json").is_file());
    assert!(app.join(".gitignore").is_file());
    assert!(app.join("src/index.js").is_file());
    assert!(!app.join("webpack.common.ejs").exists());
    assert!(!app.join("gitignore").exists());

    let webpack = fs::read_to_string(app.join("webpack.common.js")).unwrap();
    let mobile = webpack.find("mobile.html").unwrap();
    let panel = webpack.find("panel.html").unwrap();
    let config = webpack.find("config.html").unwrap();
    assert!(mobile < panel && panel < config);
    assert!(!webpack.contains("{{"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(app.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "my-ext");
    assert_eq!(manifest["version"], "0.0.1");
    assert!(manifest["scripts"]["start"].is_string());
}

#[cfg(unix)]
#[test]
fn test_existing_gitignore_is_extended() {
    let temp = TempDir::new().unwrap();
    let app = temp.path().join("my-ext");
    fs::create_dir_all(app.join(".git")).unwrap();
    fs::write(app.join(".gitignore"), "secrets.env\n").unwrap();

    hatch(temp.path())
        .args([
            "my-ext",
            "--template",
            "template-plain",
            "--view",
            "panel",
            "--installer",
            "true",
        ])
        .assert()
        .success();

    let ignore = fs::read_to_string(app.join(".gitignore")).unwrap();
    assert!(ignore.starts_with("secrets.env\n"));
    assert!(ignore.contains("node_modules"));
}
