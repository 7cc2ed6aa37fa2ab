//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::core::models::{Finding, Rule, UnitKind};
use crate::core::services::{Audit, RuleEngine, WalkStats};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of scanning one repository
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Repository reference as given
    pub repository: String,
    /// When the scan finished
    pub scanned_at: DateTime<Utc>,
    /// Walk counters
    pub stats: WalkStats,
    /// Findings in visitation order
    pub findings: Vec<Finding>,
}

impl ScanReport {
    /// Build a report from a finished audit
    #[must_use]
    pub fn new(repository: impl Into<String>, audit: Audit) -> Self {
        Self {
            repository: repository.into(),
            scanned_at: Utc::now(),
            stats: audit.stats,
            findings: audit.findings,
        }
    }

    /// Whether nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.human()),
            OutputMode::Json => self.render_json(),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn human(&self) -> String {
        let mut out = String::new();
        for (i, finding) in self.findings.iter().enumerate() {
            let location = match finding.kind {
                UnitKind::File => finding.path.as_str(),
                UnitKind::Commit => "(commit message)",
            };
            let _ = writeln!(
                out,
                "{} {} {}",
                format!("[{}]", i + 1).bold(),
                finding.url().cyan(),
                location.yellow()
            );
            let _ = writeln!(out, "    {}: {}", finding.rule.red(), finding.message);
            if !finding.excerpt.is_empty() {
                let _ = writeln!(out, "    > {}", finding.excerpt.dimmed());
            }
            out.push('\n');
        }

        let summary = format!(
            "Scanned {} commit(s) in {}: {} finding(s)",
            self.stats.commits,
            self.repository,
            self.findings.len()
        );
        if self.is_clean() {
            let _ = writeln!(out, "{}", summary.green());
        } else {
            let _ = writeln!(out, "{}", summary.red());
        }
        if self.stats.files_skipped > 0 {
            let _ = writeln!(out, "{} file(s) skipped as unreadable", self.stats.files_skipped);
        }
        out
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Active rules, in evaluation order
#[derive(Debug, Serialize)]
pub struct RuleListResult {
    /// Rules in evaluation order
    pub rules: Vec<RuleInfo>,
}

/// Information about a rule
#[derive(Debug, Serialize)]
pub struct RuleInfo {
    /// Rule name
    pub name: String,
    /// Matcher description, e.g. `contains "secret"`
    pub matcher: String,
    /// Violation message
    pub message: String,
}

impl From<&Rule> for RuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            matcher: rule.matcher.describe(),
            message: rule.message.clone(),
        }
    }
}

impl From<&RuleEngine> for RuleListResult {
    fn from(engine: &RuleEngine) -> Self {
        Self {
            rules: engine.rules().iter().map(RuleInfo::from).collect(),
        }
    }
}

impl RuleListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.rules.is_empty() {
            println!("No rules configured.");
            return;
        }

        println!("Rules (first match wins):\n");
        for (i, rule) in self.rules.iter().enumerate() {
            println!("  {}. {} {}", i + 1, rule.name.bold(), rule.matcher);
            if rule.message != rule.matcher {
                println!("     {}", rule.message);
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}
