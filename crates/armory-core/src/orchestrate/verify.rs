//! The test action
//!
//! Gated: proceeds only when `force` is set or the catalog marks the tool
//! test-enabled. A gated-off tool is reported as skipped; the caller XORs
//! the final exit code against `expect_fail`, so a skip counts as success
//! under normal polarity and as failure in the negative suite. When
//! proceeding, the tool is installed first, then its `test` script runs
//! if one exists; install-only verification otherwise.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::runner::{self, Invocation};
use crate::tool::{Hook, Tool};

use super::{Orchestrator, Outcome};

impl Orchestrator<'_> {
    pub(crate) fn test_tool(&self, tool: &Tool, catalog: &Catalog) -> Result<Outcome> {
        if !self.flags().force && !catalog.test_enabled(tool.name()) {
            tracing::info!(tool = tool.name(), "tests not enabled");
            return Ok(Outcome::TestSkipped {
                tool: tool.name().to_string(),
            });
        }

        // A failed install aborts the test outright.
        self.install_tool(tool)?;

        if tool.has_hook(Hook::Test) {
            let script = tool.hook_path(Hook::Test);
            let log = tool.test_log();
            let bin_dir = self.layout().bin_dir();
            let label = format!("test {}", tool.name());
            let outcome = runner::run(
                &Invocation::new(&script, tool.dir(), &log, &label)
                    .with_path_prepend(&bin_dir)
                    .with_stream(self.flags().verbose),
            )?;
            if !outcome.success {
                return Err(Error::TestScriptFailed {
                    tool: tool.name().to_string(),
                    log,
                });
            }
        } else {
            tracing::info!(tool = tool.name(), "no test script, install verified");
        }

        Ok(Outcome::TestPassed {
            tool: tool.name().to_string(),
        })
    }
}
