//! Domain models for leakscan
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Commit`] / [`Tree`] - the commit graph as the walker sees it
//! - [`ContentUnit`] - text submitted to the rule engine
//! - [`Rule`] / [`Violation`] - detection rules and their outcome
//! - [`Finding`] - a reported violation

mod commit;
mod content;
mod finding;
mod rule;

pub use commit::{BlobContent, BlobId, Commit, CommitId, FileChange, Tree, is_binary};
pub use content::{AddedText, ContentUnit, UnitKind};
pub use finding::Finding;
pub use rule::{MAX_EXCERPT_CHARS, Matcher, Rule, Violation};
