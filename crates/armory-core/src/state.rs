//! Explicit install-state records
//!
//! Installing a tool writes a record file into the tool directory holding
//! the install timestamp and a snapshot of the files that existed before
//! the install script ran. The record doubles as the installed marker;
//! uninstall uses the snapshot to separate build artifacts from sources.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::{INSTALL_LOG, RECORD_FILE, TEST_LOG, UNINSTALL_LOG};

/// Files the record machinery itself produces; never treated as sources
/// to keep or artifacts to delete.
const HOUSEKEEPING: &[&str] = &[RECORD_FILE, INSTALL_LOG, UNINSTALL_LOG, TEST_LOG];

/// Per-tool install record, serialized as TOML in the tool directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    /// When the install completed.
    pub installed_at: DateTime<Utc>,
    /// Sorted relative paths of every file present before the install ran.
    pub source_files: Vec<String>,
}

impl InstallRecord {
    /// Snapshot the current contents of a tool directory as its sources.
    ///
    /// Taken before any lifecycle script runs, so everything that appears
    /// later is a build artifact.
    pub fn snapshot(dir: &Path) -> Result<Self> {
        let mut files = BTreeSet::new();
        collect_files(dir, dir, &mut files)?;
        Ok(Self {
            installed_at: Utc::now(),
            source_files: files.into_iter().collect(),
        })
    }

    /// Read a record, returning `None` if the tool was never installed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = armory_fs::read_text(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Persist the record atomically.
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        armory_fs::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// True if the relative path was present before the install ran.
    pub fn is_source(&self, rel: &str) -> bool {
        self.source_files.iter().any(|f| f == rel)
    }

    /// Delete every file under `dir` that is neither a recorded source nor
    /// a housekeeping file, then prune emptied directories.
    pub fn remove_artifacts(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut present = BTreeSet::new();
        collect_files(dir, dir, &mut present)?;

        let mut removed = Vec::new();
        for rel in present {
            if self.is_source(&rel) {
                continue;
            }
            let path = dir.join(&rel);
            fs::remove_file(&path)?;
            removed.push(path);
        }
        prune_empty_dirs(dir, dir)?;
        Ok(removed)
    }
}

/// Recursively collect relative file paths, skipping housekeeping files at
/// the top level.
fn collect_files(root: &Path, dir: &Path, out: &mut BTreeSet<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            let Ok(rel_path) = path.strip_prefix(root) else {
                continue;
            };
            let rel = rel_path.to_string_lossy().to_string();
            if dir == root && HOUSEKEEPING.contains(&rel.as_str()) {
                continue;
            }
            out.insert(rel);
        }
    }
    Ok(())
}

/// Remove directories left empty after artifact deletion, bottom-up. The
/// tool directory itself is preserved.
fn prune_empty_dirs(root: &Path, dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let path = entry.path();
            prune_empty_dirs(root, &path)?;
            if fs::read_dir(&path)?.next().is_none() {
                fs::remove_dir(&path)?;
            }
        }
    }
    Ok(())
}
