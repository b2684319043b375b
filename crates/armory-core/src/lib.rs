//! Tool lifecycle orchestration for Armory
//!
//! A managed tool is a directory under the workspace's `tools/` directory
//! carrying its own lifecycle scripts (`install`, `uninstall`, `upgrade`,
//! `test`, `install-dep`). This crate models those tools, records their
//! install state explicitly, runs their scripts through a uniform subprocess
//! abstraction, and exposes the orchestrator that applies actions to a
//! single tool or fans them out across the workspace.

mod catalog;
mod error;
mod flags;
pub mod orchestrate;
mod runner;
mod state;
mod tool;

pub use catalog::{CATALOG_FILE, Catalog, CatalogEntry};
pub use error::{Error, Result};
pub use flags::Flags;
pub use orchestrate::{ALL, Action, BatchReport, ListFilter, Orchestrator, Outcome};
pub use runner::{Invocation, RunOutcome, read_log, run};
pub use state::InstallRecord;
pub use tool::{Hook, Tool};
