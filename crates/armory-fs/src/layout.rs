//! Workspace layout resolution
//!
//! An armory workspace is a directory with a `tools/` subdirectory (one
//! directory per managed tool) and a shared `bin/` directory that collects
//! symlinks to installed tool binaries.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the workspace root.
pub const ROOT_ENV: &str = "ARMORY_ROOT";

/// Name of the per-workspace tool directory.
pub const TOOLS_DIR: &str = "tools";

/// Name of the shared binary link directory.
pub const BIN_DIR: &str = "bin";

/// Resolved workspace layout.
///
/// Constructed once at startup and passed by reference into every
/// orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Resolve the layout from an explicit root, the `ARMORY_ROOT`
    /// environment variable, or the current directory, in that order.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(path) => path.to_path_buf(),
            None => match env::var_os(ROOT_ENV) {
                Some(path) => PathBuf::from(path),
                None => env::current_dir().map_err(|e| Error::io(".", e))?,
            },
        };

        if !root.is_dir() {
            return Err(Error::RootNotFound { path: root });
        }

        Ok(Self { root })
    }

    /// Build a layout rooted at the given directory without existence checks.
    ///
    /// Used by `setup` (which creates the directories) and by tests.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subdirectory per managed tool.
    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(TOOLS_DIR)
    }

    /// Shared directory of symlinks to installed tool binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Directory of a single tool by name.
    pub fn tool_dir(&self, name: &str) -> PathBuf {
        self.tools_dir().join(name)
    }

    /// Create the workspace directories if they do not exist yet.
    pub fn ensure(&self) -> Result<()> {
        for dir in [self.tools_dir(), self.bin_dir()] {
            fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_explicit_root() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::resolve(Some(temp.path())).unwrap();
        assert_eq!(layout.root(), temp.path());
    }

    #[test]
    fn resolve_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = Layout::resolve(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[test]
    fn tool_dir_nests_under_tools() {
        let layout = Layout::at("/work");
        assert_eq!(layout.tool_dir("nmap"), PathBuf::from("/work/tools/nmap"));
    }

    #[test]
    fn ensure_creates_directories() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::at(temp.path());
        layout.ensure().unwrap();
        assert!(layout.tools_dir().is_dir());
        assert!(layout.bin_dir().is_dir());
    }
}
