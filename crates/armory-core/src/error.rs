//! Error types for armory-core

use std::path::{Path, PathBuf};

/// Result type for armory-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in armory-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No tool name was given where one is required
    #[error("No tool specified")]
    MissingTool,

    /// The `all` meta-selector reached a single-tool code path
    #[error("'all' is not a tool name here")]
    InvalidMagicTool,

    /// No tool directory with the given name exists
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// The action name did not parse
    #[error("Unknown action: {name}")]
    UnknownAction { name: String },

    /// The action cannot be fanned out across all tools
    #[error("Action '{action}' cannot be applied to all tools")]
    ActionNotBatchable { action: String },

    /// A lifecycle script does not declare the strict-mode header
    #[error("Script '{script}' of tool '{tool}' must start with a strict-mode shebang (exit-on-error and trace flags)")]
    UnsafeScriptHeader { tool: String, script: String },

    /// The tool's install-dep script exited non-zero
    #[error("Dependency install failed for '{tool}'")]
    DependencyInstallFailed { tool: String, log: PathBuf },

    /// The tool's install script exited non-zero
    #[error("Install failed for '{tool}'")]
    InstallFailed { tool: String, log: PathBuf },

    /// The tool's upgrade script exited non-zero
    #[error("Upgrade failed for '{tool}'")]
    UpgradeFailed { tool: String, log: PathBuf },

    /// The tool's test script exited non-zero
    #[error("Test script failed for '{tool}'")]
    TestScriptFailed { tool: String, log: PathBuf },

    /// Filesystem error from armory-fs
    #[error(transparent)]
    Fs(#[from] armory_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// The captured log file for script failures, if one exists.
    ///
    /// Callers dump its contents to the error stream before exiting.
    pub fn log_path(&self) -> Option<&Path> {
        match self {
            Self::DependencyInstallFailed { log, .. }
            | Self::InstallFailed { log, .. }
            | Self::UpgradeFailed { log, .. }
            | Self::TestScriptFailed { log, .. } => Some(log),
            _ => None,
        }
    }
}
