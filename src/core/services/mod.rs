//! Scanning services
//!
//! Pure orchestration over the `CommitGraph` port. Nothing here touches
//! the filesystem or a concrete VCS.
//!
//! - [`diff`] - token line diff with a time budget
//! - [`extractor`] - text added between two trees
//! - [`walker`] - per-commit novel content
//! - [`rules`] - first-match rule evaluation
//! - [`auditor`] - findings for a whole repository
//! - [`cancel`] - cooperative cancellation

pub mod auditor;
pub mod cancel;
pub mod diff;
pub mod extractor;
pub mod rules;
pub mod walker;

pub use auditor::{Audit, Auditor};
pub use cancel::CancelFlag;
pub use extractor::{Extraction, Extractor, SkippedFile};
pub use rules::RuleEngine;
pub use walker::{DEFAULT_DIFF_TIMEOUT, HistoryWalker, ScanOptions, WalkStats};
