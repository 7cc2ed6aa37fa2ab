//! Content units - the text submitted to the rule engine

use serde::{Deserialize, Serialize};

/// Where a content unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Text added to a file
    File,
    /// A commit message
    Commit,
}

impl UnitKind {
    /// Stable string form (`"file"` / `"commit"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Commit => "commit",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An added span of text, tagged with its destination path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedText {
    /// Path of the file in the child tree
    pub path: String,
    /// The inserted text, newlines included
    pub text: String,
}

impl AddedText {
    /// Create an added span
    #[must_use]
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// The smallest piece of text evaluated by the rule engine, with provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Commit the text belongs to
    pub commit: String,
    /// File path; empty for commit messages
    pub path: String,
    /// File span or commit message
    pub kind: UnitKind,
    /// The text itself
    pub text: String,
}

impl ContentUnit {
    /// A unit for text added to a file at `commit`
    #[must_use]
    pub fn file(commit: &str, added: AddedText) -> Self {
        Self {
            commit: commit.to_string(),
            path: added.path,
            kind: UnitKind::File,
            text: added.text,
        }
    }

    /// A unit for the message of `commit`
    #[must_use]
    pub fn message(commit: &str, message: &str) -> Self {
        Self {
            commit: commit.to_string(),
            path: String::new(),
            kind: UnitKind::Commit,
            text: message.to_string(),
        }
    }
}
