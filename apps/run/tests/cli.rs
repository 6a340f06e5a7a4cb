use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const COMMANDS: [&str; 6] = ["api", "db", "docker", "format", "lint", "structure"];

fn run_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("run"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_every_builtin_command() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut assert = run_in(&dir).arg("--help").assert().success();
    for command in COMMANDS {
        assert = assert.stdout(predicate::str::contains(format!("\n  {command} ")));
    }
    Ok(())
}

#[test]
fn help_for_one_command_prints_its_documentation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docs = include_str!("../docs/db.md");

    run_in(&dir).args(["--help", "db"]).assert().success().stdout(predicate::str::starts_with(docs));
    run_in(&dir)
        .args(["db", "--action=shell", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage the PostgreSQL schema").and(predicate::str::contains("Commands:").not()));
    Ok(())
}

#[test]
fn unknown_command_lists_the_available_ones() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    run_in(&dir)
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown command 'deploy'"))
        .stderr(predicate::str::contains(COMMANDS.join(", ")));
    Ok(())
}

#[test]
fn conflicting_selectors_are_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    run_in(&dir)
        .args(["lint", "--mode=all", "--files=a.py"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("mutually exclusive"));
    Ok(())
}

#[test]
fn missing_command_is_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    run_in(&dir).assert().code(2).stderr(predicate::str::contains("No command given"));
    Ok(())
}

#[test]
fn explicit_config_file_must_exist() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    run_in(&dir)
        .args(["--config", "missing.toml", "structure"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to build config"));
    Ok(())
}

#[test]
fn structure_prints_the_tree_on_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("web/src"))?;
    fs::write(dir.path().join("web/src/index.astro"), "---\n---\n")?;
    fs::write(dir.path().join("folio.toml"), "[logging]\nlevel = \"error\"\n")?;

    run_in(&dir)
        .args(["structure", "--path=web", "--depth=2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("web\n└── src/\n    └── index.astro\n"))
        .stdout(predicate::str::contains("1 directory, 1 file"));
    Ok(())
}
