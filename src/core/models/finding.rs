//! Finding model
//!
//! A finding is a reported violation anchored to a commit and, for file
//! content, a path. Findings are never mutated after creation.

use serde::{Deserialize, Serialize};

use super::{ContentUnit, UnitKind, Violation};

/// A policy violation found in history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Repository reference (URL or local path)
    pub repository: String,

    /// Commit hash
    pub commit: String,

    /// File path, empty for commit messages
    pub path: String,

    /// Name of the rule that fired
    pub rule: String,

    /// Violation message
    pub message: String,

    /// Line containing the match
    pub excerpt: String,

    /// `file` or `commit`
    pub kind: UnitKind,
}

impl Finding {
    /// Build a finding from a violating unit
    #[must_use]
    pub fn new(repository: &str, unit: &ContentUnit, violation: Violation) -> Self {
        Self {
            repository: repository.to_string(),
            commit: unit.commit.clone(),
            path: unit.path.clone(),
            rule: violation.rule,
            message: violation.message,
            excerpt: violation.excerpt,
            kind: unit.kind,
        }
    }

    /// Link to the commit, e.g. `https://github.com/o/r/commit/<hash>`
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/commit/{}", self.repository.trim_end_matches('/'), self.commit)
    }
}
