//! Adapter implementations for port traits
//!
//! This module contains concrete implementations of `CommitGraph`:
//!
//! - `git/` - git repositories via `git2`, plus remote mirroring
//! - `memory` - in-memory history for tests and embedding

pub mod git;
pub mod memory;
