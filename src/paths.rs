//! Centralized path definitions for leakscan
//!
//! ## Layout
//!
//! ```text
//! ~/.leakscan/
//! └── config.toml               # Rules, diff budget, mirror settings
//!
//! $TMPDIR/leakscan/             # Default mirror root
//! └── github.com/owner/repo/    # One clone per scanned remote
//! ```

use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "LEAKSCAN_CONFIG";

/// Global config directory name
const GLOBAL_DIR: &str = ".leakscan";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Mirror directory name under the temp dir
const MIRROR_DIR: &str = "leakscan";

/// Get the global leakscan directory.
///
/// Returns `~/.leakscan/`.
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(GLOBAL_DIR)
}

/// Get the global config file path.
///
/// Returns `~/.leakscan/config.toml`.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}

/// Default root for repository mirrors.
#[must_use]
pub fn default_mirror_root() -> PathBuf {
    std::env::temp_dir().join(MIRROR_DIR)
}
