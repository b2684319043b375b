//! Armory CLI
//!
//! The command-line interface for the Armory tool manager: installs,
//! uninstalls, upgrades, links, searches, and tests managed security
//! tools.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use armory_core::Orchestrator;
use armory_fs::Layout;

use cli::Cli;
use error::Result;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(log) = e.log_path() {
                // Dump the captured script output so failures are
                // diagnosable without hunting for the log file.
                eprintln!("{} {}", "--- log:".dimmed(), log.display());
                eprint!("{}", armory_core::read_log(log));
            }
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let flags = cli.to_flags();

    // Warnings (e.g. a skipped install-dep) are always user-visible;
    // --verbose (or VERBOSE_OUTPUT) raises the level to debug.
    let level = if flags.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(flags.verbose)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    if flags.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    let layout = Layout::resolve(cli.root.as_deref())?;
    let orchestrator = Orchestrator::new(&layout, &flags);

    commands::execute(&orchestrator, cli.command)
}
