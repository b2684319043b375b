//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use armory_core::Flags;

/// Armory - workstation package manager for security tools
#[derive(Parser, Debug)]
#[command(name = "armory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Allow install-dep scripts to run with sudo
    #[arg(short = 's', long, global = true)]
    pub allow_sudo: bool,

    /// Force reinstalls and ungated tests
    #[arg(short = 'f', long, global = true)]
    pub force: bool,

    /// Stream script output live and enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Niceness applied to install scripts
    #[arg(short = 'n', long = "nice", global = true, default_value_t = 0)]
    pub nice: i32,

    /// Workspace root (defaults to $ARMORY_ROOT, then the current directory)
    #[arg(long, global = true, env = "ARMORY_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build the orchestrator flags, overlaying the legacy environment
    /// variables (ALLOW_SUDO, FORCE, VERBOSE_OUTPUT, NICE_LEVEL,
    /// EXPECTFAIL) on top of the parsed arguments.
    pub fn to_flags(&self) -> Flags {
        Flags {
            allow_sudo: self.allow_sudo,
            force: self.force,
            verbose: self.verbose,
            nice_level: self.nice,
            expect_fail: false,
        }
        .merged_with_env()
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bootstrap the workspace: directories, shell profile, dependency cache
    Setup,

    /// List known tools
    List {
        /// Only tools that are currently installed
        #[arg(short = 'i', long, conflicts_with = "uninstalled")]
        installed: bool,

        /// Only tools that are not installed
        #[arg(short = 'u', long)]
        uninstalled: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install a tool (or `all`)
    Install {
        /// Tool name, or `all`
        tool: String,
    },

    /// Uninstall a tool and remove its build artifacts (or `all`)
    Uninstall {
        /// Tool name, or `all`
        tool: String,
    },

    /// Uninstall then install, unconditionally (or `all`)
    Reinstall {
        /// Tool name, or `all`
        tool: String,
    },

    /// Upgrade a tool, falling back to a full reinstall (or `all`)
    Upgrade {
        /// Tool name, or `all`
        tool: String,
    },

    /// Refresh shared bin/ symlinks for a tool (or `all`)
    Bin {
        /// Tool name, or `all`
        tool: String,
    },

    /// Search the tool catalog
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },

    /// Install a tool and run its test script, if the catalog enables it
    Test {
        /// Tool name
        tool: String,
    },
}
