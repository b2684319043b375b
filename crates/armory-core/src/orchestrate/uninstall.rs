//! The uninstall action
//!
//! Runs the tool's `uninstall` script if present, then removes build
//! artifacts regardless of the script's exit code: every file not in the
//! recorded source snapshot is deleted and the install record removed.
//! Symlinks in the shared `bin/` that point into the tool are pruned.

use std::fs;

use crate::error::Result;
use crate::runner::{self, Invocation};
use crate::tool::{Hook, Tool};

use super::{Orchestrator, Outcome};

impl Orchestrator<'_> {
    pub(crate) fn uninstall_tool(&self, tool: &Tool) -> Result<Outcome> {
        if tool.has_hook(Hook::Uninstall) {
            let script = tool.hook_path(Hook::Uninstall);
            let log = tool.uninstall_log();
            let label = format!("uninstall {}", tool.name());
            let outcome = runner::run(
                &Invocation::new(&script, tool.dir(), &log, &label)
                    .with_stream(self.flags().verbose),
            )?;
            if !outcome.success {
                // Artifact cleanup still happens; the script is advisory.
                tracing::warn!(
                    tool = tool.name(),
                    exit_code = ?outcome.exit_code,
                    "uninstall script failed, cleaning artifacts anyway"
                );
            }
        }

        if let Some(record) = tool.record()? {
            let removed = record.remove_artifacts(tool.dir())?;
            tracing::debug!(tool = tool.name(), artifacts = removed.len(), "artifacts removed");
            fs::remove_file(tool.record_path())?;
        }

        self.unlink_tool(tool)?;

        Ok(Outcome::Uninstalled {
            tool: tool.name().to_string(),
        })
    }
}
