//! Full workflow tests for the armory binary
//!
//! These drive multi-step scenarios end to end: batch upgrades with
//! mixed results, the EXPECTFAIL polarity inversion, and the setup
//! profile edit.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use armory_core::orchestrate::PROFILE_SENTINEL;
use armory_fs::Layout;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn armory(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("armory").unwrap();
    cmd.arg("--root").arg(root);
    cmd.env_remove("ALLOW_SUDO")
        .env_remove("FORCE")
        .env_remove("VERBOSE_OUTPUT")
        .env_remove("NICE_LEVEL")
        .env_remove("EXPECTFAIL")
        .env_remove("ARMORY_PROFILE");
    cmd
}

fn write_script(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn add_tool(root: &Path, name: &str) -> std::path::PathBuf {
    let dir = Layout::at(root).tool_dir(name);
    fs::create_dir_all(&dir).unwrap();
    write_script(&dir, "install", "#!/bin/sh -ex\necho built > artifact.txt\n");
    dir
}

#[test]
fn upgrade_all_reports_tally_and_exits_zero() {
    let temp = TempDir::new().unwrap();
    let x = add_tool(temp.path(), "x");
    let y = add_tool(temp.path(), "y");
    write_script(&x, "upgrade", "#!/bin/sh\nexit 1\n");
    write_script(&y, "upgrade", "#!/bin/sh\nexit 0\n");

    armory(temp.path()).args(["install", "all"]).assert().success();

    armory(temp.path())
        .args(["upgrade", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded, 1 failed"))
        .stdout(predicate::str::contains("failed:").and(predicate::str::contains("x")));
}

#[test]
fn install_all_with_a_failure_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    add_tool(temp.path(), "good");
    let bad = temp.path().join("tools/bad");
    fs::create_dir_all(&bad).unwrap();
    write_script(&bad, "install", "#!/bin/sh -ex\nexit 1\n");

    armory(temp.path())
        .args(["install", "all"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1 succeeded, 1 failed"));
}

#[test]
fn expectfail_inverts_gated_off_test() {
    let temp = TempDir::new().unwrap();
    add_tool(temp.path(), "alpha");

    // Gated off, normal polarity: skip counts as success.
    armory(temp.path())
        .args(["test", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tests not enabled"));

    // Gated off, expecting failure: the no-op now counts as a failure.
    armory(temp.path())
        .args(["test", "alpha"])
        .env("EXPECTFAIL", "1")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn expectfail_turns_a_failing_test_green() {
    let temp = TempDir::new().unwrap();
    let dir = add_tool(temp.path(), "alpha");
    write_script(&dir, "test", "#!/bin/sh -ex\nexit 1\n");
    fs::write(
        temp.path().join("CATALOG.md"),
        "<!--tool-->| [alpha](tools/alpha) | Demo | <!--test-->\n",
    )
    .unwrap();

    armory(temp.path()).args(["test", "alpha"]).assert().failure();

    armory(temp.path())
        .args(["test", "alpha"])
        .env("EXPECTFAIL", "1")
        .assert()
        .success();
}

#[test]
fn test_runs_install_first() {
    let temp = TempDir::new().unwrap();
    let dir = add_tool(temp.path(), "alpha");
    // The test script depends on the install artifact existing.
    write_script(&dir, "test", "#!/bin/sh -ex\ntest -f artifact.txt\n");
    fs::write(
        temp.path().join("CATALOG.md"),
        "<!--tool-->| [alpha](tools/alpha) | Demo | <!--test-->\n",
    )
    .unwrap();

    armory(temp.path()).args(["test", "alpha"]).assert().success();
}

#[test]
fn reinstall_preserves_installed_state() {
    let temp = TempDir::new().unwrap();
    add_tool(temp.path(), "alpha");

    armory(temp.path()).args(["install", "alpha"]).assert().success();
    armory(temp.path()).args(["reinstall", "alpha"]).assert().success();

    armory(temp.path())
        .args(["list", "-i"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"));
}

#[test]
fn uninstall_then_list_uninstalled() {
    let temp = TempDir::new().unwrap();
    add_tool(temp.path(), "alpha");

    armory(temp.path()).args(["install", "alpha"]).assert().success();
    armory(temp.path()).args(["uninstall", "alpha"]).assert().success();

    armory(temp.path())
        .args(["list", "-u"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"));

    let tool_dir = temp.path().join("tools/alpha");
    assert!(!tool_dir.join("artifact.txt").exists());
    assert!(tool_dir.join("install").is_file());
}

#[test]
fn setup_appends_profile_block_once() {
    let temp = TempDir::new().unwrap();
    let profile = temp.path().join("zshenv");

    for _ in 0..2 {
        armory(temp.path())
            .arg("setup")
            .env("ARMORY_PROFILE", &profile)
            .assert()
            .success();
    }

    let content = fs::read_to_string(&profile).unwrap();
    assert_eq!(content.matches(PROFILE_SENTINEL).count(), 1);
    assert!(content.contains("export PATH="));
    assert!(temp.path().join("tools").is_dir());
    assert!(temp.path().join("bin").is_dir());
}

#[test]
fn search_matches_catalog_case_insensitively() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("CATALOG.md"),
        "<!--tool-->| [nmap](tools/nmap) | Network scanner |\n",
    )
    .unwrap();

    armory(temp.path())
        .args(["search", "NETWORK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nmap"));

    armory(temp.path())
        .args(["search", "does-not-exist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no catalog entries match"));
}

#[test]
fn installed_binaries_are_on_path_for_later_installs() {
    let temp = TempDir::new().unwrap();
    let provider = temp.path().join("tools/provider");
    fs::create_dir_all(&provider).unwrap();
    write_script(
        &provider,
        "install",
        "#!/bin/sh -ex\nmkdir -p bin\nprintf '#!/bin/sh\\necho provided\\n' > bin/provided-tool\nchmod +x bin/provided-tool\n",
    );

    let consumer = temp.path().join("tools/consumer");
    fs::create_dir_all(&consumer).unwrap();
    write_script(&consumer, "install", "#!/bin/sh -ex\nprovided-tool\n");

    armory(temp.path()).args(["install", "provider"]).assert().success();
    armory(temp.path()).args(["install", "consumer"]).assert().success();
}
