//! Command implementations for armory-cli

mod lifecycle;
mod query;

use armory_core::Orchestrator;

use crate::cli::Commands;
use crate::error::Result;

/// Dispatch a parsed command and return the process exit code.
pub fn execute(orchestrator: &Orchestrator<'_>, command: Commands) -> Result<i32> {
    match command {
        Commands::Setup => lifecycle::run_setup(orchestrator),
        Commands::List {
            installed,
            uninstalled,
            json,
        } => query::run_list(orchestrator, installed, uninstalled, json),
        Commands::Search { query } => query::run_search(orchestrator, &query),
        Commands::Install { tool } => {
            lifecycle::run_action(orchestrator, armory_core::Action::Install, &tool)
        }
        Commands::Uninstall { tool } => {
            lifecycle::run_action(orchestrator, armory_core::Action::Uninstall, &tool)
        }
        Commands::Reinstall { tool } => {
            lifecycle::run_action(orchestrator, armory_core::Action::Reinstall, &tool)
        }
        Commands::Upgrade { tool } => {
            lifecycle::run_action(orchestrator, armory_core::Action::Upgrade, &tool)
        }
        Commands::Bin { tool } => {
            lifecycle::run_action(orchestrator, armory_core::Action::Bin, &tool)
        }
        Commands::Test { tool } => lifecycle::run_test(orchestrator, &tool),
    }
}
