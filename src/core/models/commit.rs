//! Commit graph model
//!
//! A commit is an immutable snapshot: an id, its parent ids, a message and a
//! tree of file blobs. The core only ever reads these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Content-addressed identifier of a commit (hex hash)
pub type CommitId = String;

/// Content-addressed identifier of a file blob
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobId(pub String);

impl BlobId {
    /// Create a blob id from anything string-like
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commit as seen by the history walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash
    pub id: CommitId,

    /// Parent commit hashes, in parent order
    pub parents: Vec<CommitId>,

    /// Full commit message
    pub message: String,
}

impl Commit {
    /// Create a commit record
    #[must_use]
    pub fn new(id: impl Into<CommitId>, parents: Vec<CommitId>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parents,
            message: message.into(),
        }
    }

    /// A root commit has no parents
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// A merge commit has more than one parent
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// File snapshot of one commit: path -> blob, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, BlobId>,
}

impl Tree {
    /// The empty tree (what a root commit is compared against)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace the blob at `path`
    pub fn insert(&mut self, path: impl Into<String>, blob: BlobId) {
        self.entries.insert(path.into(), blob);
    }

    /// Blob stored at `path`, if any
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&BlobId> {
        self.entries.get(path)
    }

    /// Iterate entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlobId)> {
        self.entries.iter().map(|(path, blob)| (path.as_str(), blob))
    }

    /// Number of files in the tree
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files added or modified relative to `parent` (`None` = empty tree),
    /// in path order. Deleted and unchanged paths are left out.
    #[must_use]
    pub fn changes_from(&self, parent: Option<&Self>) -> Vec<FileChange> {
        self.iter()
            .filter_map(|(path, blob)| {
                let previous = parent.and_then(|tree| tree.get(path));
                (previous != Some(blob)).then(|| FileChange {
                    path: path.to_string(),
                    previous: previous.cloned(),
                    current: blob.clone(),
                })
            })
            .collect()
    }
}

/// One path whose content differs between a parent and a child commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path in the child tree
    pub path: String,
    /// Blob at the same path in the parent, if the path existed there
    pub previous: Option<BlobId>,
    /// Blob in the child
    pub current: BlobId,
}

impl FileChange {
    /// A path that did not exist in the parent
    #[must_use]
    pub fn added(path: impl Into<String>, current: BlobId) -> Self {
        Self {
            path: path.into(),
            previous: None,
            current,
        }
    }

    /// A path whose blob changed
    #[must_use]
    pub fn modified(path: impl Into<String>, previous: BlobId, current: BlobId) -> Self {
        Self {
            path: path.into(),
            previous: Some(previous),
            current,
        }
    }
}

impl FromIterator<(String, BlobId)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, BlobId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Decoded content of a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobContent {
    /// Text content, already decoded
    Text(String),
    /// Binary content; never scanned
    Binary,
}

impl BlobContent {
    /// Number of leading bytes inspected for a NUL byte
    pub const SNIFF_LEN: usize = 8000;

    /// Classify raw bytes the way git does: a NUL in the first 8000 bytes
    /// means binary. Invalid UTF-8 sequences in text are replaced with
    /// U+FFFD so legacy-encoded files are still scanned.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if is_binary(bytes) {
            return Self::Binary;
        }
        Self::Text(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Whether this blob is binary
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }
}

/// NUL-byte sniff over the first [`BlobContent::SNIFF_LEN`] bytes
#[must_use]
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BlobContent::SNIFF_LEN).any(|&b| b == 0)
}
