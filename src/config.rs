//! Configuration management
//!
//! Configuration is an optional TOML file. It is looked up in order:
//! an explicit path (`--config`), `$LEAKSCAN_CONFIG`, then
//! `~/.leakscan/config.toml`. A missing default file means defaults;
//! a missing explicit file is an error.
//!
//! ```toml
//! [scan]
//! diff_timeout_ms = 5000
//!
//! [mirror]
//! root = "/var/cache/leakscan"
//! gc = true
//!
//! [[rules]]
//! name = "aws-key"
//! pattern = "AKIA[0-9A-Z]{16}"
//! message = "AWS access key id"
//! ```
//!
//! Rules are evaluated in file order. With no `[[rules]]` the reference
//! set (`secret`, then `p@ssword`) is used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::Rule;
use crate::core::services::{RuleEngine, ScanOptions};
use crate::paths;

/// Errors loading or interpreting configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A rule sets neither or both of `contains` and `pattern`
    #[error("rule {0:?} must set exactly one of `contains` or `pattern`")]
    AmbiguousRule(String),

    /// A rule's regular expression does not compile
    #[error("rule {name:?} has an invalid pattern: {source}")]
    InvalidPattern {
        /// Rule name
        name: String,
        /// Regex error
        #[source]
        source: regex::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan tuning
    #[serde(default)]
    pub scan: ScanConfig,
    /// Repository mirror settings
    #[serde(default)]
    pub mirror: MirrorConfig,
    /// Ordered detection rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// Scan tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Per-file diff budget in milliseconds
    #[serde(default = "default_diff_timeout_ms")]
    pub diff_timeout_ms: u64,
}

const fn default_diff_timeout_ms() -> u64 {
    5_000
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            diff_timeout_ms: default_diff_timeout_ms(),
        }
    }
}

/// Repository mirror settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Where remote repositories are cloned; defaults to `$TMPDIR/leakscan`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Run `git gc` on the mirror after fetching
    #[serde(default = "default_gc")]
    pub gc: bool,
}

const fn default_gc() -> bool {
    true
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            root: None,
            gc: default_gc(),
        }
    }
}

/// One rule as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule name shown in findings
    pub name: String,
    /// Literal substring to flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// Regular expression to flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Description override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleConfig {
    /// Build the rule this entry describes
    pub fn to_rule(&self) -> Result<Rule, ConfigError> {
        let rule = match (&self.contains, &self.pattern) {
            (Some(needle), None) => Rule::contains(&self.name, needle),
            (None, Some(pattern)) => {
                let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    name: self.name.clone(),
                    source,
                })?;
                Rule::pattern(&self.name, re)
            },
            _ => return Err(ConfigError::AmbiguousRule(self.name.clone())),
        };
        Ok(match &self.message {
            Some(message) => rule.with_message(message),
            None => rule,
        })
    }
}

impl Config {
    /// Resolve and load configuration
    ///
    /// `explicit` (from the command line) wins over `$LEAKSCAN_CONFIG`,
    /// which wins over `~/.leakscan/config.toml`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(paths::CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let default = paths::global_config();
        if default.exists() {
            Self::from_file(&default)
        } else {
            log::debug!("No config at {}; using defaults", default.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from `path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build the rule engine; the reference rules when none are configured
    pub fn rule_engine(&self) -> Result<RuleEngine, ConfigError> {
        if self.rules.is_empty() {
            return Ok(RuleEngine::reference());
        }
        let rules = self.rules.iter().map(RuleConfig::to_rule).collect::<Result<Vec<_>, _>>()?;
        Ok(RuleEngine::new(rules))
    }

    /// Scan options derived from `[scan]`
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_diff_timeout(Duration::from_millis(self.scan.diff_timeout_ms))
    }

    /// Root directory for repository mirrors
    #[must_use]
    pub fn mirror_root(&self) -> PathBuf {
        self.mirror.root.clone().unwrap_or_else(paths::default_mirror_root)
    }
}
