//! Core scanning logic for leakscan
//!
//! This module contains the history walk, diff extraction and rule
//! evaluation with no I/O dependencies. All repository access goes through
//! the port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Commit, Tree, ContentUnit, Rule, Finding)
//! - `services/` - Walk, diff, rule evaluation, orchestration
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Scan and content error types

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{ContentError, ScanError};
