//! The upgrade action and the best-effort full upgrade
//!
//! A tool with its own `upgrade` script runs it directly; otherwise the
//! upgrade is a full reinstall. `upgrade all` iterates installed tools,
//! tallies successes and failures, and never aborts early.

use crate::error::{Error, Result};
use crate::runner::{self, Invocation};
use crate::tool::{Hook, Tool};

use super::{Action, BatchReport, Orchestrator, Outcome};

impl Orchestrator<'_> {
    pub(crate) fn upgrade_tool(&self, tool: &Tool) -> Result<Outcome> {
        if tool.has_hook(Hook::Upgrade) {
            let script = tool.hook_path(Hook::Upgrade);
            let log = tool.install_log();
            let bin_dir = self.layout().bin_dir();
            let label = format!("upgrade {}", tool.name());
            let outcome = runner::run(
                &Invocation::new(&script, tool.dir(), &log, &label)
                    .with_nice(self.flags().nice_level)
                    .with_path_prepend(&bin_dir)
                    .with_stream(self.flags().verbose),
            )?;
            if !outcome.success {
                return Err(Error::UpgradeFailed {
                    tool: tool.name().to_string(),
                    log,
                });
            }
        } else {
            // No upgrade script: uninstall and install from scratch.
            self.reinstall_tool(tool)?;
        }

        Ok(Outcome::Upgraded {
            tool: tool.name().to_string(),
        })
    }

    /// Upgrade every installed tool, treating individual failures as data.
    pub(crate) fn full_upgrade(&self) -> Result<BatchReport> {
        let mut report = BatchReport::new(Action::Upgrade, true);
        for tool in self.tools()? {
            if !tool.installed() {
                continue;
            }
            tracing::info!(tool = tool.name(), "upgrading");
            let result = self.upgrade_tool(&tool);
            report.record(tool.name(), &result);
        }
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            failed_tools = ?report.failed_tools,
            "full upgrade finished"
        );
        Ok(report)
    }
}
