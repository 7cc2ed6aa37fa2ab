//! Scan properties over in-memory histories
//!
//! Every case builds a `MemoryRepository` and runs the full audit, so the
//! walker, extractor, rule engine and auditor are exercised together.

use std::time::Duration;

use leakscan::adapters::memory::MemoryRepository;
use leakscan::core::ScanError;
use leakscan::core::models::{Commit, Finding, Rule, Tree, UnitKind};
use leakscan::core::services::{Auditor, CancelFlag, RuleEngine, ScanOptions};

fn scan(repo: &MemoryRepository) -> Vec<Finding> {
    Auditor::default().scan(repo).unwrap()
}

fn findings_for<'a>(findings: &'a [Finding], commit: &str) -> Vec<&'a Finding> {
    findings.iter().filter(|f| f.commit == commit).collect()
}

// =============================================================================
// HISTORY SHAPES
// =============================================================================

#[test]
fn empty_repository_has_no_findings() {
    let repo = MemoryRepository::new("https://example.com/o/empty");
    assert!(scan(&repo).is_empty());
}

#[test]
fn root_commit_file_is_scanned_in_full() {
    let mut repo = MemoryRepository::new("https://example.com/o/r");
    repo.commit("c1", &[], "initial import", &[("a.txt", "password=secret123")]);

    let findings = scan(&repo);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, UnitKind::File);
    assert_eq!(findings[0].path, "a.txt");
    assert_eq!(findings[0].rule, "secret");
    assert_eq!(findings[0].url(), "https://example.com/o/r/commit/c1");
}

#[test]
fn commit_message_is_its_own_unit() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "fix p@ssword bug", &[("main.rs", "fn main() {}\n")]);

    let findings = scan(&repo);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, UnitKind::Commit);
    assert_eq!(findings[0].path, "");
    assert_eq!(findings[0].rule, "password");
}

#[test]
fn merge_reports_only_the_parent_it_differs_from() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("base", &[], "base", &[("config", "host=db\n")]);
    repo.commit("a", &["base"], "topic a", &[("config", "host=db\nport=5432\n")]);
    repo.commit("b", &["base"], "topic b", &[("config", "host=db\nport=5432\ntoken=secret\n")]);
    repo.commit(
        "m",
        &["a", "b"],
        "merge topics",
        &[("config", "host=db\nport=5432\ntoken=secret\n")],
    );

    let findings = scan(&repo);
    let merge = findings_for(&findings, "m");
    assert_eq!(merge.len(), 1);
    assert_eq!(merge[0].excerpt, "token=secret");
}

#[test]
fn merge_reports_once_per_parent_when_both_differ() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("a", &[], "a", &[("f", "one\n")]);
    repo.commit("b", &[], "b", &[("f", "two\n")]);
    repo.commit("m", &["a", "b"], "m", &[("f", "secret\n")]);

    let findings = scan(&repo);
    assert_eq!(findings_for(&findings, "m").len(), 2);
}

#[test]
fn unchanged_content_is_not_reported_again() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "add", &[("a.txt", "secret\n")]);
    repo.commit("c2", &["c1"], "touch other", &[("a.txt", "secret\n"), ("b.txt", "fine\n")]);

    let findings = scan(&repo);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].commit, "c1");
}

#[test]
fn only_added_lines_are_scanned() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "add", &[("a.txt", "secret\nkeep\n")]);
    repo.commit("c2", &["c1"], "remove", &[("a.txt", "keep\n")]);
    repo.commit("c3", &["c2"], "append", &[("a.txt", "keep\nmore\n")]);

    let findings = scan(&repo);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].commit, "c1");
}

#[test]
fn renamed_file_is_treated_as_delete_and_add() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "add", &[("old.txt", "secret\n")]);
    repo.commit("c2", &["c1"], "rename", &[("new.txt", "secret\n")]);

    let findings = scan(&repo);
    let paths: Vec<_> = findings.iter().map(|f| (f.commit.as_str(), f.path.as_str())).collect();
    assert_eq!(paths, vec![("c1", "old.txt"), ("c2", "new.txt")]);
}

// =============================================================================
// CONTENT HANDLING
// =============================================================================

#[test]
fn binary_files_are_never_scanned() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "add image", &[("logo.png", "\u{0}PNG secret")]);
    assert!(scan(&repo).is_empty());
}

#[test]
fn file_turning_binary_is_skipped() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "text", &[("data", "plain\n")]);
    repo.commit("c2", &["c1"], "binary", &[("data", "\u{0}secret\n")]);
    assert!(scan(&repo).is_empty());
}

#[test]
fn legacy_encoded_text_is_still_scanned() {
    let mut repo = MemoryRepository::new("mem");
    let blob = repo.add_blob(b"caf\xe9 secret=hunter2\n");
    let tree: Tree = [("conf.ini".to_string(), blob)].into_iter().collect();
    repo.add_commit(Commit::new("c1", vec![], "init"), tree);

    let audit = Auditor::default().audit(&repo).unwrap();
    assert_eq!(audit.findings.len(), 1);
    assert_eq!(audit.findings[0].path, "conf.ini");
    assert_eq!(audit.findings[0].rule, "secret");
    assert_eq!(audit.stats.files_skipped, 0);
}

#[test]
fn diff_timeout_fails_open_to_whole_file() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "base", &[("f", "secret\nb\nc\n")]);
    repo.commit("c2", &["c1"], "edit", &[("f", "secret\nx\nc\ny\n")]);

    let normal = scan(&repo);
    assert!(findings_for(&normal, "c2").is_empty());

    let options = ScanOptions::default().with_diff_timeout(Duration::ZERO);
    let findings = Auditor::new(RuleEngine::reference(), options).scan(&repo).unwrap();
    let edited = findings_for(&findings, "c2");
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].path, "f");
}

// =============================================================================
// RULES AND ORDERING
// =============================================================================

#[test]
fn first_configured_rule_wins() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "init", &[("creds", "secret p@ssword\n")]);

    let engine = RuleEngine::new(vec![
        Rule::contains("password", "p@ssword"),
        Rule::contains("secret", "secret"),
    ]);
    let findings = Auditor::new(engine, ScanOptions::default()).scan(&repo).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, "password");
    assert_eq!(findings[0].message, "contains \"p@ssword\"");
}

#[test]
fn second_rule_still_reports_alone() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "init", &[("creds", "user p@ssword\n")]);
    let findings = scan(&repo);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, "password");
}

#[test]
fn findings_follow_commit_then_file_order() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "secret one", &[("b.txt", "secret\n"), ("a.txt", "secret\n")]);
    repo.commit("c2", &["c1"], "two", &[("a.txt", "secret\nsecret again\n"), ("b.txt", "secret\n")]);

    let order: Vec<_> = scan(&repo)
        .into_iter()
        .map(|f| (f.commit, f.path, f.kind))
        .collect();
    assert_eq!(
        order,
        vec![
            ("c1".to_string(), "a.txt".to_string(), UnitKind::File),
            ("c1".to_string(), "b.txt".to_string(), UnitKind::File),
            ("c1".to_string(), String::new(), UnitKind::Commit),
            ("c2".to_string(), "a.txt".to_string(), UnitKind::File),
        ]
    );
}

#[test]
fn scanning_twice_gives_the_same_findings() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("a", &[], "a", &[("f", "x\n")]);
    repo.commit("b", &["a"], "secret b", &[("f", "x\nsecret\n")]);
    repo.commit("c", &["a"], "c", &[("g", "p@ssword\n")]);
    repo.commit("m", &["b", "c"], "m", &[("f", "x\nsecret\n"), ("g", "p@ssword\n")]);

    let auditor = Auditor::default();
    assert_eq!(auditor.scan(&repo).unwrap(), auditor.scan(&repo).unwrap());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn cancelled_scan_returns_no_partial_result() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "secret", &[]);

    let cancel = CancelFlag::new();
    cancel.cancel();
    let options = ScanOptions::default().with_cancel(cancel);
    let result = Auditor::new(RuleEngine::reference(), options).scan(&repo);
    assert!(matches!(result, Err(ScanError::Cancelled)));
}

#[test]
fn missing_parent_aborts_the_scan() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("c1", &[], "secret", &[]);
    repo.commit("c2", &["ghost"], "child", &[]);

    let result = Auditor::default().scan(&repo);
    assert!(matches!(result, Err(ScanError::Traversal(_))));
}

#[test]
fn audit_reports_walk_counters() {
    let mut repo = MemoryRepository::new("mem");
    repo.commit("a", &[], "a", &[("f", "x\n")]);
    repo.commit("b", &["a"], "b", &[("f", "x\ny\n"), ("bin", "\u{0}")]);

    let audit = Auditor::default().audit(&repo).unwrap();
    assert_eq!(audit.stats.commits, 2);
    assert_eq!(audit.stats.comparisons, 2);
    assert!(audit.findings.is_empty());
}
