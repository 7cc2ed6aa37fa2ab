//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core scanning logic
//! and external systems (git object stores, fixtures).
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core depends only on these traits, never on concrete
//! implementations, so the history walk can be exercised against an
//! in-memory graph.

mod commit_graph;

pub use commit_graph::CommitGraph;
