//! The setup action
//!
//! One-time workspace bootstrap: creates the layout directories, appends
//! a PATH-exporting block to the user's shell profile (guarded by a
//! sentinel comment, so reruns are no-ops), and warms the dependency
//! cache by running the workspace bootstrap script once if present.

use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::runner::{self, Invocation};

use super::{Orchestrator, Outcome};

/// Sentinel comment guarding the profile block.
pub const PROFILE_SENTINEL: &str = "# armory-managed PATH";

/// Environment variable overriding the shell profile location.
pub const PROFILE_ENV: &str = "ARMORY_PROFILE";

/// Optional cache-warming script relative to the workspace root.
const BOOTSTRAP_SCRIPT: &str = "setup.d/bootstrap";

impl Orchestrator<'_> {
    pub(crate) fn setup(&self) -> Result<Outcome> {
        self.layout().ensure()?;
        let profile_updated = self.update_shell_profile()?;
        self.warm_dependency_cache()?;
        Ok(Outcome::SetupComplete { profile_updated })
    }

    /// Append the PATH block to the shell profile unless the sentinel is
    /// already there.
    fn update_shell_profile(&self) -> Result<bool> {
        let Some(profile) = profile_path() else {
            tracing::warn!("no home directory, skipping shell profile update");
            return Ok(false);
        };

        if profile.is_file() {
            let existing = armory_fs::read_text(&profile)?;
            if existing.contains(PROFILE_SENTINEL) {
                tracing::debug!(profile = %profile.display(), "profile already managed");
                return Ok(false);
            }
        }

        armory_fs::append_line(&profile, "")?;
        armory_fs::append_line(&profile, PROFILE_SENTINEL)?;
        armory_fs::append_line(
            &profile,
            &format!("export PATH=\"{}:$PATH\"", self.layout().bin_dir().display()),
        )?;
        tracing::info!(profile = %profile.display(), "shell profile updated");
        Ok(true)
    }

    /// Run the bootstrap script once to warm the dependency cache.
    /// Advisory: absence and failure are warn-only.
    fn warm_dependency_cache(&self) -> Result<()> {
        let script = self.layout().root().join(BOOTSTRAP_SCRIPT);
        if !script.is_file() {
            tracing::debug!("no bootstrap script, skipping cache warm-up");
            return Ok(());
        }

        let log = self.layout().root().join("setup.log");
        let outcome = runner::run(
            &Invocation::new(&script, self.layout().root(), &log, "bootstrap")
                .with_stream(self.flags().verbose),
        )?;
        if !outcome.success {
            tracing::warn!(
                exit_code = ?outcome.exit_code,
                log = %log.display(),
                "bootstrap script failed; dependency cache not warmed"
            );
        }
        Ok(())
    }
}

/// `ARMORY_PROFILE` override, else the zsh environment file in `$HOME`.
fn profile_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(PROFILE_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".zshenv"))
}
