//! History walker
//!
//! Visits every commit in the graph and works out its novel content: the
//! text added relative to each parent (or to the empty tree for a root
//! commit), followed by the commit message.

use std::time::Duration;

use log::{debug, info};
use serde::Serialize;

use crate::core::error::ScanError;
use crate::core::models::{Commit, ContentUnit};
use crate::core::ports::CommitGraph;

use super::cancel::CancelFlag;
use super::extractor::Extractor;

/// Default per-file diff budget
pub const DEFAULT_DIFF_TIMEOUT: Duration = Duration::from_secs(5);

/// Options controlling a walk
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Time budget for a single file diff; on expiry the whole file is scanned
    pub diff_timeout: Duration,
    /// Optional cancellation flag, checked between commits and parents
    pub cancel: Option<CancelFlag>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            diff_timeout: DEFAULT_DIFF_TIMEOUT,
            cancel: None,
        }
    }
}

impl ScanOptions {
    /// Attach a cancellation flag
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Set the per-file diff budget
    #[must_use]
    pub fn with_diff_timeout(mut self, timeout: Duration) -> Self {
        self.diff_timeout = timeout;
        self
    }
}

/// Counters collected during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Commits visited
    pub commits: usize,
    /// Tree comparisons made (one per parent, one per root commit)
    pub comparisons: usize,
    /// Content units produced
    pub units: usize,
    /// Files skipped because their content could not be read
    pub files_skipped: usize,
}

/// Walks a commit graph, producing content units per commit
#[derive(Debug)]
pub struct HistoryWalker<'g, G: CommitGraph + ?Sized> {
    graph: &'g G,
    options: &'g ScanOptions,
}

impl<'g, G: CommitGraph + ?Sized> HistoryWalker<'g, G> {
    /// Create a walker over `graph`
    pub const fn new(graph: &'g G, options: &'g ScanOptions) -> Self {
        Self { graph, options }
    }

    /// Visit every commit, handing `visit` the commit and its content units
    ///
    /// Units arrive in parent order, file order within a parent, and end
    /// with the commit message. Failing to list commits or load a tree
    /// aborts the walk; unreadable files are skipped.
    pub fn walk<F>(&self, mut visit: F) -> Result<WalkStats, ScanError>
    where
        F: FnMut(&Commit, Vec<ContentUnit>),
    {
        let commits = self.graph.commits().map_err(ScanError::Traversal)?;
        info!("Walking {} commit(s)", commits.len());

        let mut stats = WalkStats::default();
        for commit in &commits {
            self.check_cancelled()?;
            let units = self.novel_content(commit, &mut stats)?;
            debug!("Commit {}: {} unit(s)", commit.id, units.len());
            stats.commits += 1;
            stats.units += units.len();
            visit(commit, units);
        }

        Ok(stats)
    }

    /// Content units introduced by a single commit
    pub fn novel_content(
        &self,
        commit: &Commit,
        stats: &mut WalkStats,
    ) -> Result<Vec<ContentUnit>, ScanError> {
        let extractor = Extractor::new(self.graph, self.options.diff_timeout);
        let mut units = Vec::new();

        if commit.is_root() {
            let changes =
                self.graph.changed_files(None, &commit.id).map_err(ScanError::Traversal)?;
            let extraction = extractor.added_from_changes(&changes);
            stats.comparisons += 1;
            stats.files_skipped += extraction.skipped.len();
            units.extend(extraction.added.into_iter().map(|a| ContentUnit::file(&commit.id, a)));
        }

        for parent in &commit.parents {
            self.check_cancelled()?;
            let changes = self.graph.changed_files(Some(parent), &commit.id).map_err(|e| {
                ScanError::Traversal(e.context(format!("parent {parent} of commit {}", commit.id)))
            })?;
            let extraction = extractor.added_from_changes(&changes);
            stats.comparisons += 1;
            stats.files_skipped += extraction.skipped.len();
            units.extend(extraction.added.into_iter().map(|a| ContentUnit::file(&commit.id, a)));
        }

        units.push(ContentUnit::message(&commit.id, &commit.message));
        Ok(units)
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        match &self.options.cancel {
            Some(flag) if flag.is_cancelled() => Err(ScanError::Cancelled),
            _ => Ok(()),
        }
    }
}
