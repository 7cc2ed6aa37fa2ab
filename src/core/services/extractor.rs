//! Added-content extraction
//!
//! Compares a parent tree (or the empty tree) with a child tree and returns
//! the text each changed file gained. Deleted and unchanged text is never
//! returned, and binary files on either side are skipped silently.

use std::time::Duration;

use log::{debug, warn};

use crate::core::error::ContentError;
use crate::core::models::{AddedText, BlobContent, BlobId, FileChange, Tree};
use crate::core::ports::CommitGraph;

use super::diff::{self, DiffError};

/// A file whose content could not be extracted for one comparison
#[derive(Debug)]
pub struct SkippedFile {
    /// Path in the child tree
    pub path: String,
    /// Why it was skipped
    pub error: ContentError,
}

/// Result of comparing two trees
#[derive(Debug, Default)]
pub struct Extraction {
    /// Added spans, in path order then file order
    pub added: Vec<AddedText>,
    /// Files that failed to load and were left out
    pub skipped: Vec<SkippedFile>,
}

/// Extracts added text from tree comparisons
#[derive(Debug)]
pub struct Extractor<'g, G: CommitGraph + ?Sized> {
    graph: &'g G,
    timeout: Duration,
}

impl<'g, G: CommitGraph + ?Sized> Extractor<'g, G> {
    /// Create an extractor reading blobs from `graph`
    pub const fn new(graph: &'g G, timeout: Duration) -> Self {
        Self { graph, timeout }
    }

    /// Text added to `child` relative to `parent` (`None` = empty tree)
    ///
    /// Files are visited in path order. A file that cannot be read is
    /// recorded in [`Extraction::skipped`] and the comparison continues.
    pub fn added_content(&self, parent: Option<&Tree>, child: &Tree) -> Extraction {
        self.added_from_changes(&child.changes_from(parent))
    }

    /// Text added by a list of changed files, as produced by
    /// [`CommitGraph::changed_files`]
    pub fn added_from_changes(&self, changes: &[FileChange]) -> Extraction {
        let mut extraction = Extraction::default();

        for change in changes {
            match self.file_additions(&change.path, change.previous.as_ref(), &change.current) {
                Ok(added) => extraction.added.extend(added),
                Err(error) => {
                    warn!("Skipping {}: {error}", change.path);
                    extraction.skipped.push(SkippedFile {
                        path: change.path.clone(),
                        error,
                    });
                },
            }
        }

        extraction
    }

    /// Added spans for a single file
    ///
    /// `previous` is the blob at the same path in the parent tree, if the
    /// path existed there. Renames are not tracked, so a moved file shows up
    /// as entirely new.
    pub fn file_additions(
        &self,
        path: &str,
        previous: Option<&BlobId>,
        current: &BlobId,
    ) -> Result<Vec<AddedText>, ContentError> {
        if previous == Some(current) {
            return Ok(Vec::new());
        }

        let BlobContent::Text(new_text) = self.graph.read_blob(current)? else {
            debug!("Skipping binary file {path}");
            return Ok(Vec::new());
        };

        let old_text = match previous {
            None => return Ok(vec![AddedText::new(path, new_text)]),
            Some(blob) => match self.graph.read_blob(blob)? {
                BlobContent::Text(text) => text,
                BlobContent::Binary => {
                    debug!("Skipping {path}: previous version is binary");
                    return Ok(Vec::new());
                },
            },
        };

        match diff::inserted_text(&old_text, &new_text, self.timeout) {
            Ok(spans) => Ok(spans.into_iter().map(|text| AddedText::new(path, text)).collect()),
            Err(DiffError::Timeout(budget)) => {
                warn!("Diff of {path} exceeded {budget:?}; scanning the whole file");
                Ok(vec![AddedText::new(path, new_text)])
            },
        }
    }
}
