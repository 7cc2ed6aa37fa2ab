//! Error taxonomy for scanning
//!
//! - [`ScanError`] aborts a scan: acquisition, traversal, cancellation.
//! - [`ContentError`] is per-file; the walker logs it and moves on.

use thiserror::Error;

use super::models::BlobId;

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    /// The repository could not be made available locally
    #[error("failed to acquire repository {repository}")]
    Acquisition {
        /// Repository reference
        repository: String,
        /// Underlying cause
        #[source]
        source: anyhow::Error,
    },

    /// The commit graph could not be traversed
    #[error("failed to traverse commit graph")]
    Traversal(#[source] anyhow::Error),

    /// A cancellation request was observed
    #[error("scan cancelled")]
    Cancelled,
}

/// Errors reading a single blob
#[derive(Debug, Error)]
pub enum ContentError {
    /// Blob not present in the object store
    #[error("blob {0} not found")]
    MissingBlob(BlobId),

    /// Blob exists but could not be read or decoded
    #[error("blob {blob} is unreadable: {reason}")]
    Unreadable {
        /// The blob
        blob: BlobId,
        /// Why reading failed
        reason: String,
    },
}
