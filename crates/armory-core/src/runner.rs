//! Uniform lifecycle-script execution
//!
//! Every lifecycle script runs through one code path: optional `sudo` and
//! `nice` wrappers, PATH precedence for the workspace `bin/` directory,
//! output appended to a per-tool log file, and an explicit exit-status
//! check. No exceptions are used as control flow; callers inspect the
//! returned outcome.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use chrono::Utc;

use crate::error::Result;

/// One lifecycle-script invocation.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// The script to execute.
    pub script: &'a Path,
    /// Working directory for the child (the tool directory).
    pub work_dir: &'a Path,
    /// Log file output is appended to.
    pub log_path: &'a Path,
    /// Label written into the log header, e.g. `install nmap`.
    pub label: &'a str,
    /// Run the script with elevated privileges.
    pub sudo: bool,
    /// Niceness for the child; 0 disables the wrapper.
    pub nice_level: i32,
    /// Directory prepended to the child's PATH, if any.
    pub path_prepend: Option<&'a Path>,
    /// Stream output live in addition to logging it.
    pub stream: bool,
}

impl<'a> Invocation<'a> {
    pub fn new(script: &'a Path, work_dir: &'a Path, log_path: &'a Path, label: &'a str) -> Self {
        Self {
            script,
            work_dir,
            log_path,
            label,
            sudo: false,
            nice_level: 0,
            path_prepend: None,
            stream: false,
        }
    }

    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    pub fn with_nice(mut self, level: i32) -> Self {
        self.nice_level = level;
        self
    }

    pub fn with_path_prepend(mut self, dir: &'a Path) -> Self {
        self.path_prepend = Some(dir);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Result of one invocation.
#[derive(Debug)]
pub struct RunOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub log_path: PathBuf,
}

/// Run a script, blocking until it exits.
///
/// A timestamped header line is appended to the log before the child's
/// output. There is no timeout; a hung script hangs the caller.
pub fn run(inv: &Invocation<'_>) -> Result<RunOutcome> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(inv.log_path)?;
    writeln!(
        log,
        "=== {} at {} ===",
        inv.label,
        Utc::now().to_rfc3339()
    )?;

    let mut cmd = build_command(inv);
    cmd.current_dir(inv.work_dir);

    if let Some(prepend) = inv.path_prepend {
        cmd.env("PATH", prepended_path(prepend));
    }

    tracing::debug!(script = %inv.script.display(), sudo = inv.sudo, nice = inv.nice_level, "running lifecycle script");

    let status = if inv.stream {
        run_streamed(&mut cmd, &log)?
    } else {
        cmd.stdout(Stdio::from(log.try_clone()?))
            .stderr(Stdio::from(log))
            .status()?
    };

    Ok(RunOutcome {
        success: status.success(),
        exit_code: status.code(),
        log_path: inv.log_path.to_path_buf(),
    })
}

/// Read back the full captured log for error reporting.
pub fn read_log(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Wrap the script in `sudo` and `nice -n <level>` as requested.
fn build_command(inv: &Invocation<'_>) -> Command {
    let mut argv: Vec<std::ffi::OsString> = Vec::new();
    if inv.sudo {
        argv.push("sudo".into());
    }
    if inv.nice_level != 0 {
        argv.push("nice".into());
        argv.push("-n".into());
        argv.push(inv.nice_level.to_string().into());
    }
    argv.push(inv.script.as_os_str().to_os_string());

    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    cmd
}

fn prepended_path(dir: &Path) -> std::ffi::OsString {
    let existing = std::env::var_os("PATH").unwrap_or_default();
    let mut parts = vec![dir.to_path_buf()];
    parts.extend(std::env::split_paths(&existing));
    std::env::join_paths(parts).unwrap_or_else(|_| dir.as_os_str().to_os_string())
}

/// Tee the child's output to the log file and the live console.
fn run_streamed(cmd: &mut Command, log: &File) -> std::io::Result<std::process::ExitStatus> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return child.wait();
    };

    // Both sinks are opened in append mode, so interleaved writes from the
    // two reader threads stay line-atomic enough for a log file.
    let out_log = log.try_clone()?;
    let err_log = log.try_clone()?;

    thread::scope(|scope| {
        scope.spawn(move || tee(stdout, out_log, &mut std::io::stdout()));
        scope.spawn(move || tee(stderr, err_log, &mut std::io::stderr()));
    });

    child.wait()
}

fn tee(reader: impl Read, mut log: File, console: &mut dyn Write) {
    let buffered = BufReader::new(reader);
    for line in buffered.lines() {
        let Ok(line) = line else { break };
        let _ = writeln!(log, "{}", line);
        let _ = writeln!(console, "{}", line);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn captures_output_and_exit_status() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "install", "#!/bin/sh -ex\necho hello\n");
        let log = temp.path().join("install.log");

        let outcome = run(&Invocation::new(&script, temp.path(), &log, "install demo")).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));

        let content = read_log(&log);
        assert!(content.contains("=== install demo at "));
        assert!(content.contains("hello"));
    }

    #[test]
    fn failure_is_reported_not_raised() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "install", "#!/bin/sh\nexit 3\n");
        let log = temp.path().join("install.log");

        let outcome = run(&Invocation::new(&script, temp.path(), &log, "install demo")).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[test]
    fn log_appends_across_runs() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "install", "#!/bin/sh -ex\necho once\n");
        let log = temp.path().join("install.log");

        let inv = Invocation::new(&script, temp.path(), &log, "install demo");
        run(&inv).unwrap();
        run(&inv).unwrap();

        // The -x trace also echoes the command line, so count exact
        // output lines rather than substrings.
        let content = read_log(&log);
        assert_eq!(content.lines().filter(|l| *l == "once").count(), 2);
        assert_eq!(content.matches("=== install demo at ").count(), 2);
    }

    #[test]
    fn path_prepend_takes_precedence() {
        let temp = TempDir::new().unwrap();
        let fake_bin = temp.path().join("fakebin");
        fs::create_dir_all(&fake_bin).unwrap();
        write_script(&fake_bin, "probe", "#!/bin/sh\necho shadowed\n");

        let script = write_script(temp.path(), "install", "#!/bin/sh -ex\nprobe\n");
        let log = temp.path().join("install.log");

        let outcome = run(
            &Invocation::new(&script, temp.path(), &log, "install demo")
                .with_path_prepend(&fake_bin),
        )
        .unwrap();
        assert!(outcome.success);
        assert!(read_log(&log).contains("shadowed"));
    }

    #[test]
    fn streamed_run_still_logs() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "install", "#!/bin/sh -ex\necho streamed\n");
        let log = temp.path().join("install.log");

        let outcome = run(
            &Invocation::new(&script, temp.path(), &log, "install demo").with_stream(true),
        )
        .unwrap();
        assert!(outcome.success);
        assert!(read_log(&log).contains("streamed"));
    }
}
