//! The managed-tool model
//!
//! A tool is a directory under the workspace's `tools/` directory. It is
//! valid only if it carries an executable `install` script; every other
//! lifecycle hook is optional. Install state is derived from the presence
//! of the install record, not from any version-control side channel.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use armory_fs::Layout;

use crate::error::{Error, Result};
use crate::state::InstallRecord;

/// Lifecycle hooks a tool may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Install,
    InstallDep,
    Uninstall,
    Upgrade,
    Test,
}

impl Hook {
    /// Script file name inside the tool directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::InstallDep => "install-dep",
            Self::Uninstall => "uninstall",
            Self::Upgrade => "upgrade",
            Self::Test => "test",
        }
    }

    /// Hooks whose scripts must carry the strict-mode header.
    ///
    /// `upgrade` is exempt; it predates the header policy and commonly
    /// delegates straight to the package's own updater.
    pub fn header_checked() -> &'static [Hook] {
        &[Self::Install, Self::InstallDep, Self::Uninstall, Self::Test]
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// File name of the per-tool install record.
pub const RECORD_FILE: &str = ".armory-install.toml";

/// Log file for install and upgrade runs.
pub const INSTALL_LOG: &str = "install.log";

/// Log file for uninstall runs.
pub const UNINSTALL_LOG: &str = "uninstall.log";

/// Log file for test runs.
pub const TEST_LOG: &str = "test.log";

/// A named tool directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    name: String,
    dir: PathBuf,
}

impl Tool {
    /// Load a tool by name, failing with `UnknownTool` if its directory
    /// does not exist.
    pub fn load(layout: &Layout, name: &str) -> Result<Self> {
        let dir = layout.tool_dir(name);
        if !dir.is_dir() {
            return Err(Error::UnknownTool {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a lifecycle script, whether or not it exists.
    pub fn hook_path(&self, hook: Hook) -> PathBuf {
        self.dir.join(hook.file_name())
    }

    /// True if the tool implements the hook with an executable script.
    pub fn has_hook(&self, hook: Hook) -> bool {
        is_executable(&self.hook_path(hook))
    }

    /// A directory is a valid tool only if it has an install script.
    pub fn is_valid(&self) -> bool {
        self.has_hook(Hook::Install)
    }

    /// The tool's own `bin/` directory of linkable binaries, if any.
    pub fn bin_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.join("bin");
        dir.is_dir().then_some(dir)
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE)
    }

    /// Install state: the record written by the install step exists.
    pub fn installed(&self) -> bool {
        self.record_path().is_file()
    }

    /// Read the install record, if the tool is installed.
    pub fn record(&self) -> Result<Option<InstallRecord>> {
        InstallRecord::load(&self.record_path())
    }

    pub fn install_log(&self) -> PathBuf {
        self.dir.join(INSTALL_LOG)
    }

    pub fn uninstall_log(&self) -> PathBuf {
        self.dir.join(UNINSTALL_LOG)
    }

    pub fn test_log(&self) -> PathBuf {
        self.dir.join(TEST_LOG)
    }

    /// Enforce the strict-mode header policy on every present script.
    ///
    /// Runs before any subprocess is spawned; a single violating script
    /// fails the whole action.
    pub fn check_script_headers(&self) -> Result<()> {
        for hook in Hook::header_checked() {
            let path = self.hook_path(*hook);
            if !path.is_file() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            if !has_strict_header(&content) {
                return Err(Error::UnsafeScriptHeader {
                    tool: self.name.clone(),
                    script: hook.file_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A strict-mode header is a shebang whose flag tokens enable both
/// exit-on-error (`e`) and trace (`x`), e.g. `#!/bin/sh -ex` or
/// `#!/usr/bin/env -S bash -eux`.
fn has_strict_header(content: &str) -> bool {
    let Some(first) = content.lines().next() else {
        return false;
    };
    let Some(rest) = first.strip_prefix("#!") else {
        return false;
    };
    let mut flags = String::new();
    for token in rest.split_whitespace() {
        if let Some(chars) = token.strip_prefix('-') {
            flags.push_str(chars);
        }
    }
    flags.contains('e') && flags.contains('x')
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
