//! Repository acquisition
//!
//! Makes a repository available locally before a scan. Local directories are
//! opened in place. Remote URLs are mirrored under a root directory as
//! `<root>/<host>/<owner>/<repo>`: clone if absent, otherwise open and
//! force-fetch, and if the existing directory is not a usable repository,
//! remove it and clone again.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use git2::Repository;
use log::{info, warn};

use super::GitRepository;
use crate::core::error::ScanError;

/// Refspec fetched when refreshing an existing mirror
const FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// Where a repository comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    /// An existing local repository
    Local(PathBuf),
    /// A remote URL to mirror
    Remote(String),
}

impl RepositorySource {
    /// Classify a user-supplied repository reference
    ///
    /// Existing directories are local; everything else is treated as a URL.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        let path = Path::new(reference);
        if path.is_dir() {
            Self::Local(path.to_path_buf())
        } else {
            Self::Remote(reference.to_string())
        }
    }

    /// The reference as given
    #[must_use]
    pub fn reference(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }
}

/// Mirror directory for `url` under `root`
///
/// Uses the last three path segments of the URL (host, owner, name) with any
/// `.git` suffix and `user@` prefix dropped. Empty, `.` and `..` segments
/// are ignored.
///
/// # Errors
///
/// Fails when fewer than two usable segments remain, so a mirror never
/// lands on `root` itself or directly on a bare name.
pub fn mirror_path(root: &Path, url: &str) -> anyhow::Result<PathBuf> {
    let usable = |s: &&str| !s.is_empty() && *s != "." && *s != "..";
    let mut segments: Vec<&str> = url
        .split(['/', ':'])
        .map(|s| s.rsplit('@').next().unwrap_or(s))
        .filter(usable)
        .collect();
    if let Some(last) = segments.last_mut() {
        *last = last.trim_end_matches(".git");
    }
    segments.retain(usable);

    if segments.len() < 2 {
        anyhow::bail!("Cannot derive a mirror directory from {url:?}");
    }
    let start = segments.len().saturating_sub(3);
    Ok(segments[start..].iter().fold(root.to_path_buf(), |path, segment| path.join(segment)))
}

/// Make `source` available locally and open it
///
/// Remote repositories are mirrored under `mirror_root`; when `gc` is set,
/// `git gc` runs on the mirror afterwards (a failure there is only logged).
///
/// # Errors
///
/// Any failure to obtain a usable repository is [`ScanError::Acquisition`].
pub fn acquire(
    source: &RepositorySource,
    mirror_root: &Path,
    gc: bool,
) -> Result<GitRepository, ScanError> {
    let reference = source.reference();
    let acquisition = |source: anyhow::Error| ScanError::Acquisition {
        repository: reference.clone(),
        source,
    };

    match source {
        RepositorySource::Local(path) => GitRepository::open(path)
            .map(|repo| repo.with_location(&reference))
            .map_err(acquisition),
        RepositorySource::Remote(url) => {
            let path = mirror_path(mirror_root, url).map_err(acquisition)?;
            let repo = open_or_clone(mirror_root, &path, url).map_err(acquisition)?;
            if gc {
                if let Err(e) = run_gc(&path) {
                    warn!("git gc failed in {}: {e:#}", path.display());
                }
            }
            Ok(GitRepository::new(repo, url.clone()))
        },
    }
}

/// Clone into `path`, or refresh an existing clone there
///
/// An existing directory that is not a repository, or whose origin is a
/// different URL, is removed and cloned again. `path` must lie strictly
/// inside `root`.
fn open_or_clone(root: &Path, path: &Path, url: &str) -> anyhow::Result<Repository> {
    anyhow::ensure!(
        path != root && path.starts_with(root),
        "Mirror path {} is not inside {}",
        path.display(),
        root.display()
    );
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if !path.exists() {
        return clone(path, url);
    }

    match Repository::open(path) {
        Ok(repo) if origin_matches(&repo, url) => {
            fetch(&repo).with_context(|| format!("Failed to fetch {url}"))?;
            Ok(repo)
        },
        Ok(_) => {
            warn!("Existing mirror at {} has a different origin; recloning", path.display());
            reclone(path, url)
        },
        Err(e) => {
            warn!("Existing mirror at {} is unusable ({e}); recloning", path.display());
            reclone(path, url)
        },
    }
}

fn origin_matches(repo: &Repository, url: &str) -> bool {
    repo.find_remote("origin").is_ok_and(|remote| {
        remote.url().is_some_and(|origin| origin.trim_end_matches('/') == url.trim_end_matches('/'))
    })
}

fn reclone(path: &Path, url: &str) -> anyhow::Result<Repository> {
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    clone(path, url)
}

fn clone(path: &Path, url: &str) -> anyhow::Result<Repository> {
    info!("Cloning {url} into {}", path.display());
    Repository::clone(url, path).with_context(|| format!("Failed to clone {url}"))
}

fn fetch(repo: &Repository) -> anyhow::Result<()> {
    let mut remote = repo.find_remote("origin").context("Mirror has no origin remote")?;
    info!("Fetching {}", remote.url().unwrap_or("origin"));
    remote.fetch(&[FETCH_REFSPEC], None, None)?;
    Ok(())
}

/// Run `git gc` in `path`
///
/// # Errors
///
/// Returns an error if git cannot be run or exits unsuccessfully.
pub fn run_gc(path: &Path) -> anyhow::Result<()> {
    let output = Command::new("git")
        .current_dir(path)
        .args(["gc", "--prune=now", "--quiet"])
        .output()
        .context("Failed to run git gc")?;

    if !output.status.success() {
        anyhow::bail!("git gc failed: {}", String::from_utf8_lossy(&output.stderr).trim());
    }
    Ok(())
}
