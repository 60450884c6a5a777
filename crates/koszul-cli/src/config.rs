//! # Configuration Loading
//!
//! Settings come from four layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. environment (`KOSZUL_MAX_*`, `KOSZUL_RANK_*`),
//! 3. the YAML file named by `--config`,
//! 4. subcommand flags.
//!
//! ```yaml
//! limits:
//!   max_tensor_entries: 134217728
//!   max_dimension: 16777216
//! oracle:
//!   program: /opt/linbox/rank
//!   args: []
//!   timeout_secs: 600
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use koszul_core::Limits;
use koszul_oracle::{ConfigError, OracleConfig};

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KoszulConfig {
    /// Size ceiling overrides.
    pub limits: LimitsFile,
    /// External rank tool overrides.
    pub oracle: OracleFile,
}

/// `limits:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsFile {
    pub max_tensor_entries: Option<usize>,
    pub max_dimension: Option<usize>,
}

/// `oracle:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleFile {
    pub program: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl KoszulConfig {
    /// Parse YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse config YAML")
    }

    /// Load `path`, or the empty configuration when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Environment limits with file overrides applied.
    pub fn limits(&self) -> Limits {
        self.limits_over(Limits::from_env())
    }

    fn limits_over(&self, base: Limits) -> Limits {
        Limits {
            max_tensor_entries: self
                .limits
                .max_tensor_entries
                .unwrap_or(base.max_tensor_entries),
            max_dimension: self.limits.max_dimension.unwrap_or(base.max_dimension),
        }
    }

    /// Settings for the external rank tool after every layer is applied.
    ///
    /// `program` and `timeout_secs` are the subcommand flags.
    pub fn oracle(&self, program: Option<&Path>, timeout_secs: Option<u64>) -> Result<OracleConfig> {
        let env = match OracleConfig::from_env() {
            Ok(config) => Some(config),
            Err(ConfigError::MissingProgram) => None,
            Err(e) => return Err(e.into()),
        };
        self.oracle_over(env, program, timeout_secs)
    }

    /// Whether any layer names a rank tool: the flag, the file, or
    /// `KOSZUL_RANK_BIN`.
    pub fn has_rank_tool(&self, program: Option<&Path>) -> bool {
        program.is_some()
            || self.oracle.program.is_some()
            || std::env::var_os("KOSZUL_RANK_BIN").is_some()
    }

    fn oracle_over(
        &self,
        env: Option<OracleConfig>,
        program: Option<&Path>,
        timeout_secs: Option<u64>,
    ) -> Result<OracleConfig> {
        let chosen = program
            .map(Path::to_path_buf)
            .or_else(|| self.oracle.program.clone())
            .or_else(|| env.as_ref().map(|c| c.program.clone()));
        let Some(chosen) = chosen else {
            bail!(
                "no rank tool configured: pass --rank-bin, set oracle.program in the config file, \
                 or set KOSZUL_RANK_BIN"
            );
        };

        let mut config = env.unwrap_or_else(|| OracleConfig::new(&chosen));
        config.program = chosen;
        if let Some(args) = &self.oracle.args {
            config.args = args.clone();
        }
        if let Some(secs) = timeout_secs.or(self.oracle.timeout_secs) {
            if secs == 0 {
                bail!("rank tool timeout must be at least one second");
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
