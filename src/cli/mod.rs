//! CLI layer for leakscan
//!
//! This module contains the command-line interface:
//!
//! - [`app`] - CLI definitions and entry point
//! - [`commands`] - Command implementations

pub mod app;
pub mod commands;

pub use app::run;

/// Exit status: scan completed with no findings
pub const EXIT_CLEAN: u8 = 0;

/// Exit status: scan completed with findings
pub const EXIT_FINDINGS: u8 = 1;

/// Exit status: the command failed
pub const EXIT_ERROR: u8 = 2;
