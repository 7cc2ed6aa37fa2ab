//! Scan a repository's history

use std::process::ExitCode;
use std::time::Duration;

use log::info;

use crate::cli::app::ScanArgs;
use crate::cli::{EXIT_CLEAN, EXIT_FINDINGS};
use leakscan::adapters::git::{RepositorySource, acquire};
use leakscan::config::Config;
use leakscan::core::services::Auditor;
use leakscan::output::{OutputMode, ScanReport};

/// Acquire the repository, audit it and print the report
pub fn scan(args: &ScanArgs, config: &Config, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let engine = config.rule_engine()?;
    let mut options = config.scan_options();
    if let Some(ms) = args.diff_timeout_ms {
        options = options.with_diff_timeout(Duration::from_millis(ms));
    }

    let source = RepositorySource::parse(&args.repository);
    let mirror_root = args.mirror_root.clone().unwrap_or_else(|| config.mirror_root());
    let gc = config.mirror.gc && !args.no_gc;

    let repo = acquire(&source, &mirror_root, gc)?;
    info!("Scanning {} with {} rule(s)", source.reference(), engine.len());

    let audit = Auditor::new(engine, options).audit(&repo)?;
    let report = ScanReport::new(source.reference(), audit);
    report.render(mode);

    Ok(ExitCode::from(if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_FINDINGS
    }))
}
