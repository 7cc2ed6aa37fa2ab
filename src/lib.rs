//! leakscan - Audit the full history of a git repository for leaked secrets
//!
//! Every commit is compared with each of its parents; only the text a commit
//! introduces (plus its message) is checked against an ordered rule list.
//! The first rule that matches a piece of content produces a finding.
//!
//! The scanning core (`core`) is pure and talks to history through the
//! `CommitGraph` port; `adapters` provide git and in-memory implementations.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;
