//! Commit graph port
//!
//! The narrow interface the scanner needs from a version-control backend:
//! enumerate commits with their parents and messages, load a commit's file
//! tree or the files it changed, and read blobs.

use crate::core::error::ContentError;
use crate::core::models::{BlobContent, BlobId, Commit, FileChange, Tree};

/// Read-only view of a repository's commit graph
///
/// Implementations wrap a concrete backend (git, an in-memory fixture).
/// Errors from [`commits`](Self::commits), [`tree`](Self::tree) and
/// [`changed_files`](Self::changed_files) are traversal failures and abort
/// a scan. Errors from
/// [`read_blob`](Self::read_blob) only skip the affected file.
pub trait CommitGraph {
    /// Repository reference used on findings (URL or path)
    fn location(&self) -> String;

    /// Every commit reachable in the graph
    fn commits(&self) -> anyhow::Result<Vec<Commit>>;

    /// File tree of a commit
    fn tree(&self, commit: &str) -> anyhow::Result<Tree>;

    /// Files added or modified by `commit` relative to `parent`
    /// (`None` = the empty tree), in path order
    ///
    /// The default compares full trees. Backends that can diff trees
    /// natively should override it.
    fn changed_files(&self, parent: Option<&str>, commit: &str) -> anyhow::Result<Vec<FileChange>> {
        let child = self.tree(commit)?;
        let parent = parent.map(|id| self.tree(id)).transpose()?;
        Ok(child.changes_from(parent.as_ref()))
    }

    /// Read and classify a blob
    fn read_blob(&self, blob: &BlobId) -> Result<BlobContent, ContentError>;
}
