//! Git integration adapter
//!
//! Implements `CommitGraph` over a local git repository using `git2`.
//!
//! - [`mirror`] - Cloning / fetching remote repositories into a local mirror

pub mod mirror;

use std::path::Path;

use anyhow::Context;
use git2::{
    Delta, ErrorCode, FileMode, ObjectType, Oid, Repository, Sort, TreeWalkMode, TreeWalkResult,
};

use crate::core::error::ContentError;
use crate::core::models::{BlobContent, BlobId, Commit, FileChange, Tree};
use crate::core::ports::CommitGraph;

pub use mirror::{RepositorySource, acquire, mirror_path};

/// Git-backed commit graph
pub struct GitRepository {
    repo: Repository,
    location: String,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.repo.path())
            .field("location", &self.location)
            .finish()
    }
}

impl GitRepository {
    /// Wrap an opened repository, reporting findings against `location`
    #[must_use]
    pub fn new(repo: Repository, location: impl Into<String>) -> Self {
        Self {
            repo,
            location: location.into(),
        }
    }

    /// Open the repository at `path` (a work tree or a bare repository)
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a git repository.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        Ok(Self::new(repo, path.display().to_string()))
    }

    /// Replace the repository reference used on findings
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Path of the `.git` directory
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    fn find_commit(&self, id: &str) -> anyhow::Result<git2::Commit<'_>> {
        let oid = Oid::from_str(id).with_context(|| format!("Invalid commit id {id}"))?;
        self.repo.find_commit(oid).with_context(|| format!("Commit {id} not found"))
    }
}

impl CommitGraph for GitRepository {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn commits(&self) -> anyhow::Result<Vec<Commit>> {
        if self.repo.is_empty()? {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_glob("*").context("Failed to walk references")?;
        // Detached HEAD is not under refs/
        if let Err(e) = revwalk.push_head() {
            log::debug!("HEAD not pushed: {e}");
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Commit {
                id: commit.id().to_string(),
                parents: commit.parent_ids().map(|p| p.to_string()).collect(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            });
        }

        Ok(commits)
    }

    fn tree(&self, commit: &str) -> anyhow::Result<Tree> {
        let git_tree = self.find_commit(commit)?.tree()?;

        let mut tree = Tree::empty();
        git_tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            // Submodule links and subtrees carry no content of their own
            if entry.kind() == Some(ObjectType::Blob) {
                let name = String::from_utf8_lossy(entry.name_bytes());
                tree.insert(format!("{root}{name}"), BlobId::new(entry.id().to_string()));
            }
            TreeWalkResult::Ok
        })?;

        Ok(tree)
    }

    fn changed_files(&self, parent: Option<&str>, commit: &str) -> anyhow::Result<Vec<FileChange>> {
        let new_tree = self.find_commit(commit)?.tree()?;
        let old_tree = match parent {
            Some(id) => Some(self.find_commit(id)?.tree()?),
            None => None,
        };
        let diff = self.repo.diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let (old, new) = (delta.old_file(), delta.new_file());
            if delta.status() == Delta::Deleted || !is_content(new.mode()) || old.id() == new.id() {
                continue;
            }
            let Some(path) = new.path_bytes() else {
                continue;
            };
            let path = String::from_utf8_lossy(path).into_owned();
            let current = BlobId::new(new.id().to_string());
            changes.push(if delta.status() != Delta::Added && is_content(old.mode()) {
                FileChange::modified(path, BlobId::new(old.id().to_string()), current)
            } else {
                FileChange::added(path, current)
            });
        }

        changes.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        Ok(changes)
    }

    fn read_blob(&self, blob: &BlobId) -> Result<BlobContent, ContentError> {
        let unreadable = |reason: String| ContentError::Unreadable {
            blob: blob.clone(),
            reason,
        };

        let oid = Oid::from_str(blob.as_str()).map_err(|e| unreadable(e.message().to_string()))?;
        let found = self.repo.find_blob(oid).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                ContentError::MissingBlob(blob.clone())
            } else {
                unreadable(e.message().to_string())
            }
        })?;

        Ok(BlobContent::from_bytes(found.content()))
    }
}

/// Modes that name a blob in the tree (submodule links do not)
const fn is_content(mode: FileMode) -> bool {
    matches!(
        mode,
        FileMode::Blob | FileMode::BlobGroupWritable | FileMode::BlobExecutable | FileMode::Link
    )
}
