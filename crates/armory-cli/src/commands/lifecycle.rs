//! Lifecycle commands: install, uninstall, reinstall, upgrade, bin,
//! test, setup

use colored::Colorize;

use armory_core::{Action, BatchReport, Orchestrator, Outcome};

use crate::error::Result;

/// Run a lifecycle action (single tool or `all`) and report the outcome.
pub fn run_action(orchestrator: &Orchestrator<'_>, action: Action, tool: &str) -> Result<i32> {
    let outcome = orchestrator.resolve(action, Some(tool))?;
    Ok(report(&outcome))
}

/// The test action: outcome polarity is XOR'd against `EXPECTFAIL`, so
/// the orchestrator can serve as its own negative-test suite.
pub fn run_test(orchestrator: &Orchestrator<'_>, tool: &str) -> Result<i32> {
    let expect_fail = orchestrator.flags().expect_fail;

    let success = match orchestrator.resolve(Action::Test, Some(tool)) {
        Ok(Outcome::TestSkipped { tool }) => {
            println!(
                "{} tests not enabled for '{}' (enable in the catalog or pass {})",
                "skipped:".yellow().bold(),
                tool,
                "--force".cyan()
            );
            true
        }
        Ok(Outcome::TestPassed { tool }) => {
            println!("{} '{}' verified", "ok:".green().bold(), tool);
            true
        }
        Ok(_) => true,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(log) = e.log_path() {
                eprintln!("{} {}", "--- log:".dimmed(), log.display());
                eprint!("{}", armory_core::read_log(log));
            }
            false
        }
    };

    // success != expect_fail means the run matched expectations
    Ok(if success != expect_fail { 0 } else { 1 })
}

pub fn run_setup(orchestrator: &Orchestrator<'_>) -> Result<i32> {
    let outcome = orchestrator.resolve(Action::Setup, None)?;
    if let Outcome::SetupComplete { profile_updated } = outcome {
        if profile_updated {
            println!(
                "{} workspace ready; restart your shell to pick up PATH",
                "setup:".green().bold()
            );
        } else {
            println!("{} workspace ready (profile already managed)", "setup:".green().bold());
        }
    }
    Ok(0)
}

/// Print an outcome and map it to an exit code.
fn report(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Installed { tool } => {
            println!("{} '{}' installed", "ok:".green().bold(), tool);
            0
        }
        Outcome::AlreadyInstalled { tool } => {
            println!(
                "{} '{}' is already installed (use {} to reinstall)",
                "warning:".yellow().bold(),
                tool,
                "--force".cyan()
            );
            0
        }
        Outcome::Uninstalled { tool } => {
            println!("{} '{}' uninstalled", "ok:".green().bold(), tool);
            0
        }
        Outcome::Upgraded { tool } => {
            println!("{} '{}' upgraded", "ok:".green().bold(), tool);
            0
        }
        Outcome::Linked { tool, links } => {
            println!(
                "{} {} link(s) refreshed for '{}'",
                "ok:".green().bold(),
                links,
                tool
            );
            0
        }
        Outcome::Batch(batch) => report_batch(batch),
        _ => 0,
    }
}

fn report_batch(batch: &BatchReport) -> i32 {
    println!(
        "{} {}: {} succeeded, {} failed",
        batch.action.to_string().bold(),
        "all".bold(),
        batch.succeeded.to_string().green(),
        if batch.failed == 0 {
            batch.failed.to_string().normal()
        } else {
            batch.failed.to_string().red()
        }
    );
    if !batch.failed_tools.is_empty() {
        println!("{} {}", "failed:".red().bold(), batch.failed_tools.join(", "));
    }

    if batch.best_effort || batch.failed == 0 { 0 } else { 1 }
}
