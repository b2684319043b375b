//! Integration tests for workspace layout resolution

use assert_fs::TempDir;
use assert_fs::prelude::*;
use armory_fs::Layout;

#[test]
fn ensure_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let layout = Layout::at(temp.path());

    layout.ensure().unwrap();
    layout.ensure().unwrap();

    temp.child("tools").assert(predicates::path::is_dir());
    temp.child("bin").assert(predicates::path::is_dir());
}

#[test]
fn ensure_preserves_existing_content() {
    let temp = TempDir::new().unwrap();
    temp.child("tools/nmap/install").write_str("#!/bin/sh -ex\n").unwrap();

    let layout = Layout::at(temp.path());
    layout.ensure().unwrap();

    temp.child("tools/nmap/install")
        .assert(predicates::path::is_file());
}

#[test]
fn resolve_prefers_explicit_path_over_cwd() {
    let temp = TempDir::new().unwrap();
    let layout = Layout::resolve(Some(temp.path())).unwrap();
    assert_eq!(layout.root(), temp.path());
    assert_ne!(layout.root(), std::env::current_dir().unwrap());
}
