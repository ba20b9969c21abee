//! Integration tests for the adoc binary

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn adoc_cmd(config: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("adoc");
    cmd.env("ADOC_CONFIG", config);
    cmd
}

#[test]
fn test_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    adoc_cmd(&temp.path().join("adoc.toml"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("adoc"));
    Ok(())
}

#[test]
fn test_help() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    adoc_cmd(&temp.path().join("adoc.toml"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AsciiDoc"))
        .stdout(predicate::str::contains("convert"));
    Ok(())
}

#[test]
fn test_convert_help_lists_options() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    adoc_cmd(&temp.path().join("adoc.toml"))
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--out-file"))
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--no-header-footer"));
    Ok(())
}

#[test]
fn test_invalid_command() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    adoc_cmd(&temp.path().join("adoc.toml"))
        .arg("invalid")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_config_path_honors_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("custom.toml");
    adoc_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
    Ok(())
}

#[test]
fn test_config_set_then_show() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("adoc.toml");

    adoc_cmd(&config)
        .args(["config", "set", "backend", "docbook"])
        .assert()
        .success();
    assert!(fs::read_to_string(&config)?.contains("docbook"));

    adoc_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend"))
        .stdout(predicate::str::contains("docbook"));
    Ok(())
}

#[test]
fn test_convert_without_toolkit_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("adoc.toml");
    let package = temp.path().join("empty.zip");
    fs::write(&package, b"not a zip archive")?;
    fs::write(
        &config,
        format!("package_path = {:?}\n", package.to_string_lossy()),
    )?;
    let source = temp.path().join("guide.txt");
    fs::write(&source, "= Guide\n")?;

    adoc_cmd(&config)
        .arg("convert")
        .arg(&source)
        .assert()
        .failure()
        .code(1);
    Ok(())
}
