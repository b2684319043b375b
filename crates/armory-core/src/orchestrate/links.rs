//! The bin action
//!
//! Refreshes symlinks from the shared workspace `bin/` directory to every
//! file under a tool's own `bin/` subdirectory, overwriting links of the
//! same name. Idempotent; a tool without a `bin/` directory is a no-op.
//! The shared directory is the only cross-tool resource, and writes to it
//! stay on this single code path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::tool::Tool;

use super::{Orchestrator, Outcome};

impl Orchestrator<'_> {
    pub(crate) fn link_tool(&self, tool: &Tool) -> Result<Outcome> {
        let Some(src_dir) = tool.bin_dir() else {
            tracing::debug!(tool = tool.name(), "no bin directory, nothing to link");
            return Ok(Outcome::Linked {
                tool: tool.name().to_string(),
                links: 0,
            });
        };

        let bin_dir = self.layout().bin_dir();
        fs::create_dir_all(&bin_dir)?;

        let mut links = 0;
        for entry in fs::read_dir(&src_dir)? {
            let entry = entry?;
            let path = entry.path();
            // Follow symlinks; a bin/ entry pointing at a build output is
            // still a linkable file.
            let Ok(meta) = fs::metadata(&path) else {
                tracing::warn!(path = %path.display(), "skipping dangling bin entry");
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let source = path.canonicalize()?;
            let target = bin_dir.join(entry.file_name());
            replace_link(&source, &target)?;
            links += 1;
        }

        tracing::debug!(tool = tool.name(), links, "bin links refreshed");
        Ok(Outcome::Linked {
            tool: tool.name().to_string(),
            links,
        })
    }

    /// Remove shared-bin symlinks that point into this tool's directory.
    pub(crate) fn unlink_tool(&self, tool: &Tool) -> Result<()> {
        let bin_dir = self.layout().bin_dir();
        if !bin_dir.is_dir() {
            return Ok(());
        }
        let tool_dir = tool.dir().canonicalize()?;

        for entry in fs::read_dir(&bin_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Ok(dest) = fs::read_link(&path) else {
                continue;
            };
            if dest.starts_with(&tool_dir) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

/// Replace whatever occupies `target` with a symlink to `source`.
fn replace_link(source: &Path, target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(_) => fs::remove_file(target)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    symlink(source, target)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, target)
}
