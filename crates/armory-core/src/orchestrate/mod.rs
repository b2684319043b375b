//! The tool orchestrator
//!
//! Resolves an action and a tool name (or the `all` meta-selector),
//! validates preconditions, and either performs the action on a single
//! tool or fans it out sequentially across the workspace, aggregating
//! success and failure counts.

mod install;
mod links;
mod setup;
mod uninstall;
mod upgrade;
mod verify;

pub use setup::{PROFILE_ENV, PROFILE_SENTINEL};

use std::fmt;
use std::fs;
use std::str::FromStr;

use armory_fs::Layout;

use crate::catalog::{CATALOG_FILE, Catalog};
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::tool::Tool;

/// Meta-selector expanding to every (or every installed) tool.
pub const ALL: &str = "all";

/// The fixed set of orchestrator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Setup,
    List,
    Install,
    Uninstall,
    Reinstall,
    Upgrade,
    Bin,
    Search,
    Test,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::List => "list",
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Reinstall => "reinstall",
            Self::Upgrade => "upgrade",
            Self::Bin => "bin",
            Self::Search => "search",
            Self::Test => "test",
        };
        f.write_str(name)
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "setup" => Ok(Self::Setup),
            "list" => Ok(Self::List),
            "install" => Ok(Self::Install),
            "uninstall" => Ok(Self::Uninstall),
            "reinstall" => Ok(Self::Reinstall),
            "upgrade" => Ok(Self::Upgrade),
            "bin" => Ok(Self::Bin),
            "search" => Ok(Self::Search),
            "test" => Ok(Self::Test),
            other => Err(Error::UnknownAction {
                name: other.to_string(),
            }),
        }
    }
}

/// Filter for the `list` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    InstalledOnly,
    UninstalledOnly,
}

/// Aggregated result of a fan-out across tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub action: Action,
    pub succeeded: usize,
    pub failed: usize,
    /// Names of failed tools, in iteration order.
    pub failed_tools: Vec<String>,
    /// Best-effort batches (upgrade all) always exit 0.
    pub best_effort: bool,
}

impl BatchReport {
    fn new(action: Action, best_effort: bool) -> Self {
        Self {
            action,
            succeeded: 0,
            failed: 0,
            failed_tools: Vec::new(),
            best_effort,
        }
    }

    fn record(&mut self, tool: &str, result: &Result<Outcome>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(error) => {
                tracing::warn!(tool, %error, "batch step failed, continuing");
                self.failed += 1;
                self.failed_tools.push(tool.to_string());
            }
        }
    }
}

/// What a resolved action produced, for the caller to report.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing further to report.
    Done,
    /// Install short-circuited; not an error, exits 0.
    AlreadyInstalled { tool: String },
    Installed { tool: String },
    Uninstalled { tool: String },
    Upgraded { tool: String },
    Linked { tool: String, links: usize },
    Listed(Vec<String>),
    Matches(Vec<String>),
    Batch(BatchReport),
    /// Test gate was off; polarity applied by the caller.
    TestSkipped { tool: String },
    TestPassed { tool: String },
    SetupComplete { profile_updated: bool },
}

/// The orchestrator. Borrows the resolved layout and flags; all state
/// lives on disk.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    layout: &'a Layout,
    flags: &'a Flags,
}

impl<'a> Orchestrator<'a> {
    pub fn new(layout: &'a Layout, flags: &'a Flags) -> Self {
        Self { layout, flags }
    }

    pub fn layout(&self) -> &Layout {
        self.layout
    }

    pub fn flags(&self) -> &Flags {
        self.flags
    }

    /// Apply an action to a tool name, intercepting the `all` fan-out.
    ///
    /// `arg` is the tool name for lifecycle actions and the query for
    /// `search`; `list` and `setup` ignore it.
    pub fn resolve(&self, action: Action, arg: Option<&str>) -> Result<Outcome> {
        match action {
            Action::Setup => self.setup(),
            Action::List => Ok(Outcome::Listed(self.list(ListFilter::All)?)),
            Action::Search => self.search(arg.unwrap_or_default()),
            _ => {
                let name = arg.unwrap_or_default();
                if name.is_empty() {
                    return Err(Error::MissingTool);
                }
                if name == ALL {
                    self.fan_out(action)
                } else {
                    self.single(action, name)
                }
            }
        }
    }

    fn single(&self, action: Action, name: &str) -> Result<Outcome> {
        let tool = self.require_tool(name)?;
        match action {
            Action::Install => self.install_tool(&tool),
            Action::Uninstall => self.uninstall_tool(&tool),
            Action::Reinstall => self.reinstall_tool(&tool),
            Action::Upgrade => self.upgrade_tool(&tool),
            Action::Bin => self.link_tool(&tool),
            Action::Test => {
                let catalog = self.catalog()?;
                self.test_tool(&tool, &catalog)
            }
            Action::Setup | Action::List | Action::Search => unreachable!("handled in resolve"),
        }
    }

    fn fan_out(&self, action: Action) -> Result<Outcome> {
        let targets = match action {
            Action::Install => self.tools()?,
            Action::Bin | Action::Uninstall | Action::Reinstall => self.installed_tools()?,
            Action::Upgrade => return Ok(Outcome::Batch(self.full_upgrade()?)),
            _ => {
                return Err(Error::ActionNotBatchable {
                    action: action.to_string(),
                });
            }
        };

        let mut report = BatchReport::new(action, false);
        for tool in &targets {
            tracing::info!(tool = tool.name(), %action, "batch step");
            let result = match action {
                Action::Install => self.install_tool(tool),
                Action::Bin => self.link_tool(tool),
                Action::Uninstall => self.uninstall_tool(tool),
                Action::Reinstall => self.reinstall_tool(tool),
                _ => unreachable!("batchable actions only"),
            };
            report.record(tool.name(), &result);
        }
        Ok(Outcome::Batch(report))
    }

    /// Validate and load a single tool.
    ///
    /// Directories without an install script are not tools; they resolve
    /// as unknown, matching what `list` shows.
    pub fn require_tool(&self, name: &str) -> Result<Tool> {
        if name.is_empty() {
            return Err(Error::MissingTool);
        }
        if name == ALL {
            return Err(Error::InvalidMagicTool);
        }
        let tool = Tool::load(self.layout, name)?;
        if !tool.is_valid() {
            return Err(Error::UnknownTool {
                name: name.to_string(),
            });
        }
        Ok(tool)
    }

    /// Every valid tool in the workspace, sorted by name.
    pub fn tools(&self) -> Result<Vec<Tool>> {
        let tools_dir = self.layout.tools_dir();
        if !tools_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&tools_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        let mut tools = Vec::new();
        for name in names {
            let tool = Tool::load(self.layout, &name)?;
            if tool.is_valid() {
                tools.push(tool);
            }
        }
        Ok(tools)
    }

    fn installed_tools(&self) -> Result<Vec<Tool>> {
        Ok(self
            .tools()?
            .into_iter()
            .filter(|tool| tool.installed())
            .collect())
    }

    /// Enumerate tool names, optionally filtered by install state.
    pub fn list(&self, filter: ListFilter) -> Result<Vec<String>> {
        Ok(self
            .tools()?
            .into_iter()
            .filter(|tool| match filter {
                ListFilter::All => true,
                ListFilter::InstalledOnly => tool.installed(),
                ListFilter::UninstalledOnly => !tool.installed(),
            })
            .map(|tool| tool.name().to_string())
            .collect())
    }

    /// Catalog substring search.
    pub fn search(&self, query: &str) -> Result<Outcome> {
        let catalog = self.catalog()?;
        let matches = catalog
            .search(query)
            .into_iter()
            .map(|entry| entry.line.clone())
            .collect();
        Ok(Outcome::Matches(matches))
    }

    pub(crate) fn catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.layout.root().join(CATALOG_FILE))
    }
}
