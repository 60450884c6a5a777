//! External rank tool configuration.
//!
//! The tool's location is deployment-specific. Override via environment
//! variables or explicit construction.

use std::path::PathBuf;
use std::time::Duration;

/// Default time allowed for one rank computation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default cap on captured stdout/stderr bytes.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// How to invoke the external rank tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Executable that reads the interchange format on stdin.
    pub program: PathBuf,
    /// Extra command-line arguments.
    pub args: Vec<String>,
    /// Wall-clock limit before the process is killed.
    pub timeout: Duration,
    /// Cap on captured bytes per output stream.
    pub max_output_bytes: usize,
}

impl OracleConfig {
    /// Configuration for `program` with default timeout and no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    /// Replace the argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KOSZUL_RANK_BIN` (required)
    /// - `KOSZUL_RANK_ARGS` (whitespace separated, default: none)
    /// - `KOSZUL_RANK_TIMEOUT_SECS` (positive, default: 300)
    pub fn from_env() -> Result<Self, ConfigError> {
        let program = std::env::var_os("KOSZUL_RANK_BIN").ok_or(ConfigError::MissingProgram)?;
        let args: Vec<String> = std::env::var("KOSZUL_RANK_ARGS")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let timeout_secs = match std::env::var("KOSZUL_RANK_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self::new(program)
            .with_args(args)
            .with_timeout(Duration::from_secs(timeout_secs)))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("KOSZUL_RANK_BIN environment variable is required for the external rank oracle")]
    MissingProgram,
    #[error("invalid KOSZUL_RANK_TIMEOUT_SECS value {0:?}; expected a positive number of seconds")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, MutexGuard};

    const VARS: [&str; 3] = [
        "KOSZUL_RANK_BIN",
        "KOSZUL_RANK_ARGS",
        "KOSZUL_RANK_TIMEOUT_SECS",
    ];

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores the rank variables on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<OsString>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn set(pairs: &[(&'static str, &str)]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let saved = VARS.iter().map(|&k| (k, std::env::var_os(k))).collect();
            for k in VARS {
                std::env::remove_var(k);
            }
            for (k, v) in pairs {
                std::env::set_var(k, v);
            }
            Self { saved, _lock: lock }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (k, v) in &self.saved {
                match v {
                    Some(v) => std::env::set_var(k, v),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn from_env_requires_program() {
        let _env = EnvGuard::set(&[("KOSZUL_RANK_TIMEOUT_SECS", "5")]);
        assert_eq!(OracleConfig::from_env(), Err(ConfigError::MissingProgram));
    }

    #[test]
    fn from_env_reads_all_variables() {
        let _env = EnvGuard::set(&[
            ("KOSZUL_RANK_BIN", "/opt/linbox/rank"),
            ("KOSZUL_RANK_ARGS", "  --field   QQ "),
            ("KOSZUL_RANK_TIMEOUT_SECS", " 7 "),
        ]);
        let cfg = OracleConfig::from_env().unwrap();
        assert_eq!(cfg.program, PathBuf::from("/opt/linbox/rank"));
        assert_eq!(cfg.args, vec!["--field".to_string(), "QQ".to_string()]);
        assert_eq!(cfg.timeout, Duration::from_secs(7));
    }

    #[test]
    fn from_env_defaults_timeout_and_args() {
        let _env = EnvGuard::set(&[("KOSZUL_RANK_BIN", "rank")]);
        let cfg = OracleConfig::from_env().unwrap();
        assert!(cfg.args.is_empty());
        assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn from_env_rejects_zero_and_garbage_timeouts() {
        for bad in ["0", " 0 ", "abc", "-3", ""] {
            let _env = EnvGuard::set(&[
                ("KOSZUL_RANK_BIN", "rank"),
                ("KOSZUL_RANK_TIMEOUT_SECS", bad),
            ]);
            assert_eq!(
                OracleConfig::from_env(),
                Err(ConfigError::InvalidTimeout(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = OracleConfig::new("/opt/linbox/rank")
            .with_args(["--field", "QQ"])
            .with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.program, PathBuf::from("/opt/linbox/rank"));
        assert_eq!(cfg.args, vec!["--field".to_string(), "QQ".to_string()]);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
    }
}
