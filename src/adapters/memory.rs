//! In-memory commit graph
//!
//! Implements `CommitGraph` over commits and blobs held in memory. Blobs
//! are content-addressed, so identical content always gets the same id and
//! an untouched file compares equal across commits, as it does in git.

use std::collections::HashMap;

use anyhow::Context;

use crate::core::error::ContentError;
use crate::core::models::{BlobContent, BlobId, Commit, Tree};
use crate::core::ports::CommitGraph;

/// A commit graph built in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    location: String,
    commits: Vec<Commit>,
    trees: HashMap<String, Tree>,
    blobs: HashMap<BlobId, Vec<u8>>,
    ids: HashMap<Vec<u8>, BlobId>,
}

impl MemoryRepository {
    /// Create an empty repository reported as `location`
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Store a blob, returning its id
    pub fn add_blob(&mut self, bytes: impl AsRef<[u8]>) -> BlobId {
        let bytes = bytes.as_ref();
        if let Some(id) = self.ids.get(bytes) {
            return id.clone();
        }
        let id = BlobId::new(format!("blob-{}", self.blobs.len() + 1));
        self.blobs.insert(id.clone(), bytes.to_vec());
        self.ids.insert(bytes.to_vec(), id.clone());
        id
    }

    /// Record a commit with an already-built tree
    pub fn add_commit(&mut self, commit: Commit, tree: Tree) {
        self.trees.insert(commit.id.clone(), tree);
        self.commits.push(commit);
    }

    /// Record a commit whose tree holds `files` as `(path, content)` pairs
    ///
    /// Commits are listed in the order they were added.
    pub fn commit(&mut self, id: &str, parents: &[&str], message: &str, files: &[(&str, &str)]) {
        let tree = files
            .iter()
            .map(|(path, content)| ((*path).to_string(), self.add_blob(content)))
            .collect();
        let parents = parents.iter().map(|p| (*p).to_string()).collect();
        self.add_commit(Commit::new(id, parents, message), tree);
    }

    /// Number of commits recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Whether no commits were recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl CommitGraph for MemoryRepository {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn commits(&self) -> anyhow::Result<Vec<Commit>> {
        Ok(self.commits.clone())
    }

    fn tree(&self, commit: &str) -> anyhow::Result<Tree> {
        self.trees.get(commit).cloned().with_context(|| format!("unknown commit {commit}"))
    }

    fn read_blob(&self, blob: &BlobId) -> Result<BlobContent, ContentError> {
        let bytes = self.blobs.get(blob).ok_or_else(|| ContentError::MissingBlob(blob.clone()))?;
        Ok(BlobContent::from_bytes(bytes))
    }
}
