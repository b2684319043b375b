//! The install action
//!
//! Order of operations: already-installed short-circuit, strict-header
//! lint on every present script, pre-install source snapshot, optional
//! elevated dependency install, the install script itself (with PATH
//! precedence for the workspace `bin/` and the configured niceness),
//! install record, and finally the `bin` link refresh.

use crate::error::{Error, Result};
use crate::runner::{self, Invocation};
use crate::state::InstallRecord;
use crate::tool::{Hook, Tool};

use super::{Orchestrator, Outcome};

impl Orchestrator<'_> {
    pub(crate) fn install_tool(&self, tool: &Tool) -> Result<Outcome> {
        if tool.installed() && !self.flags().force {
            tracing::info!(tool = tool.name(), "already installed, skipping");
            return Ok(Outcome::AlreadyInstalled {
                tool: tool.name().to_string(),
            });
        }

        // Lint before anything runs; force does not bypass this.
        tool.check_script_headers()?;

        // On a forced rerun the directory already holds the previous run's
        // build artifacts; a fresh snapshot would record them as sources.
        // Keep the original pre-install snapshot instead.
        let mut record = match tool.record()? {
            Some(existing) => existing,
            None => InstallRecord::snapshot(tool.dir())?,
        };

        self.install_dependencies(tool)?;
        self.run_install_script(tool)?;

        record.installed_at = chrono::Utc::now();
        record.store(&tool.record_path())?;

        self.link_tool(tool)?;

        Ok(Outcome::Installed {
            tool: tool.name().to_string(),
        })
    }

    /// Install as part of reinstall/upgrade, where the record has just
    /// been removed and the short-circuit must not apply.
    pub(crate) fn reinstall_tool(&self, tool: &Tool) -> Result<Outcome> {
        self.uninstall_tool(tool)?;
        self.install_tool(tool)?;
        Ok(Outcome::Installed {
            tool: tool.name().to_string(),
        })
    }

    fn install_dependencies(&self, tool: &Tool) -> Result<()> {
        if !tool.has_hook(Hook::InstallDep) {
            return Ok(());
        }
        if !self.flags().allow_sudo {
            tracing::warn!(
                tool = tool.name(),
                "install-dep present but sudo not allowed; system dependencies may be missing"
            );
            return Ok(());
        }

        let script = tool.hook_path(Hook::InstallDep);
        let log = tool.install_log();
        let label = format!("install-dep {}", tool.name());
        let outcome = runner::run(
            &Invocation::new(&script, tool.dir(), &log, &label)
                .with_sudo(true)
                .with_stream(self.flags().verbose),
        )?;

        if !outcome.success {
            return Err(Error::DependencyInstallFailed {
                tool: tool.name().to_string(),
                log,
            });
        }
        Ok(())
    }

    fn run_install_script(&self, tool: &Tool) -> Result<()> {
        let script = tool.hook_path(Hook::Install);
        let log = tool.install_log();
        let bin_dir = self.layout().bin_dir();
        let label = format!("install {}", tool.name());
        let outcome = runner::run(
            &Invocation::new(&script, tool.dir(), &log, &label)
                .with_nice(self.flags().nice_level)
                .with_path_prepend(&bin_dir)
                .with_stream(self.flags().verbose),
        )?;

        if !outcome.success {
            return Err(Error::InstallFailed {
                tool: tool.name().to_string(),
                log,
            });
        }
        Ok(())
    }
}
