//! Audit orchestration
//!
//! Drives the history walker, evaluates every content unit with the rule
//! engine, and collects findings in visitation order. Findings are neither
//! reordered nor de-duplicated: a violation visible from two merge parents
//! is reported twice.

use log::info;

use crate::core::error::ScanError;
use crate::core::models::Finding;
use crate::core::ports::CommitGraph;

use super::rules::RuleEngine;
use super::walker::{HistoryWalker, ScanOptions, WalkStats};

/// Outcome of a completed audit
#[derive(Debug, Clone, Default)]
pub struct Audit {
    /// Findings in commit, parent, file order
    pub findings: Vec<Finding>,
    /// Walk counters
    pub stats: WalkStats,
}

/// Scans repositories with a fixed rule set
#[derive(Debug, Clone, Default)]
pub struct Auditor {
    engine: RuleEngine,
    options: ScanOptions,
}

impl Auditor {
    /// Create an auditor from an explicit rule engine and options
    #[must_use]
    pub const fn new(engine: RuleEngine, options: ScanOptions) -> Self {
        Self { engine, options }
    }

    /// The rule engine in use
    #[must_use]
    pub const fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Scan options in use
    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan `graph`, returning findings in visitation order
    pub fn scan<G: CommitGraph + ?Sized>(&self, graph: &G) -> Result<Vec<Finding>, ScanError> {
        self.audit(graph).map(|audit| audit.findings)
    }

    /// Scan `graph`, returning findings together with walk counters
    ///
    /// All-or-nothing: on a traversal error or cancellation nothing found
    /// so far is returned.
    pub fn audit<G: CommitGraph + ?Sized>(&self, graph: &G) -> Result<Audit, ScanError> {
        let repository = graph.location();
        let mut findings = Vec::new();

        let stats = HistoryWalker::new(graph, &self.options).walk(|_, units| {
            for unit in units {
                if let Some(violation) = self.engine.evaluate(&unit.text) {
                    findings.push(Finding::new(&repository, &unit, violation));
                }
            }
        })?;

        info!(
            "Scanned {} commit(s) in {}: {} finding(s), {} file(s) skipped",
            stats.commits,
            repository,
            findings.len(),
            stats.files_skipped
        );

        Ok(Audit { findings, stats })
    }
}
