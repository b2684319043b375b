//! Process-wide configuration flags
//!
//! Built once at startup from CLI arguments and the legacy environment
//! variables, then passed by reference into every orchestrator call. No
//! ambient global lookups happen after construction.

use std::env;

/// Environment variable enabling elevated dependency installs.
pub const ALLOW_SUDO_ENV: &str = "ALLOW_SUDO";
/// Environment variable forcing reinstalls and ungated tests.
pub const FORCE_ENV: &str = "FORCE";
/// Environment variable enabling live script output.
pub const VERBOSE_ENV: &str = "VERBOSE_OUTPUT";
/// Environment variable setting the niceness of install scripts.
pub const NICE_LEVEL_ENV: &str = "NICE_LEVEL";
/// Environment variable inverting the `test` action's exit polarity.
pub const EXPECT_FAIL_ENV: &str = "EXPECTFAIL";

/// Read-only orchestrator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// Run `install-dep` scripts with elevated privileges.
    pub allow_sudo: bool,
    /// Bypass the already-installed short-circuit and test gating.
    pub force: bool,
    /// Stream script output live in addition to logging it.
    pub verbose: bool,
    /// Niceness applied to install scripts (0 disables the wrapper).
    pub nice_level: i32,
    /// Invert the `test` action's success polarity.
    pub expect_fail: bool,
}

impl Flags {
    /// Build flags from the environment alone.
    pub fn from_env() -> Self {
        Self::default().merged_with_env()
    }

    /// Overlay environment variables onto already-set flags.
    ///
    /// CLI flags win by being set; the legacy variables can only turn
    /// options on, never off.
    pub fn merged_with_env(mut self) -> Self {
        self.allow_sudo |= env_truthy(ALLOW_SUDO_ENV);
        self.force |= env_truthy(FORCE_ENV);
        self.verbose |= env_truthy(VERBOSE_ENV);
        self.expect_fail |= env_truthy(EXPECT_FAIL_ENV);
        if self.nice_level == 0
            && let Some(level) = env_int(NICE_LEVEL_ENV)
        {
            self.nice_level = level;
        }
        self
    }
}

/// The legacy variables carry `0`/`1` values; accept common spellings.
fn env_truthy(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.trim(), "1" | "true" | "yes" | "on"),
        Err(_) => false,
    }
}

fn env_int(name: &str) -> Option<i32> {
    env::var(name).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off() {
        let flags = Flags::default();
        assert!(!flags.allow_sudo);
        assert!(!flags.force);
        assert!(!flags.verbose);
        assert!(!flags.expect_fail);
        assert_eq!(flags.nice_level, 0);
    }

    #[test]
    fn env_truthy_spellings() {
        // Env-var tests mutate process state; keep them in one test to
        // avoid racing parallel test threads on the same variable.
        unsafe {
            env::set_var("ARMORY_TEST_TRUTHY", "1");
        }
        assert!(env_truthy("ARMORY_TEST_TRUTHY"));
        unsafe {
            env::set_var("ARMORY_TEST_TRUTHY", "0");
        }
        assert!(!env_truthy("ARMORY_TEST_TRUTHY"));
        unsafe {
            env::set_var("ARMORY_TEST_TRUTHY", "yes");
        }
        assert!(env_truthy("ARMORY_TEST_TRUTHY"));
        unsafe {
            env::remove_var("ARMORY_TEST_TRUTHY");
        }
        assert!(!env_truthy("ARMORY_TEST_TRUTHY"));
    }

    #[test]
    fn cli_flags_survive_merge() {
        let flags = Flags {
            force: true,
            nice_level: 10,
            ..Flags::default()
        }
        .merged_with_env();
        assert!(flags.force);
        assert_eq!(flags.nice_level, 10);
    }
}
