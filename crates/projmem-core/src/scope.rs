//! Project scope detection.
//!
//! Every entry is keyed by the git remote and branch of the working
//! directory the command runs in. Detection shells out to `git`; when that
//! fails (no git, no repository, no `origin` remote) commands still run
//! against a shared fallback scope instead of erroring out.

use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::debug;

/// Scope used when the working directory has no usable git identity.
pub const FALLBACK_REPO: &str = "local";
pub const FALLBACK_BRANCH: &str = "unknown";

/// The (repo, branch) pair that partitions all stored entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScope {
    /// Normalized `origin` remote URL, e.g. `github.com/acme/widgets`.
    pub repo: String,
    /// Current branch name; empty on a detached HEAD.
    pub branch: String,
}

impl ProjectScope {
    /// Detect the scope of the current working directory.
    ///
    /// Never fails: any git problem degrades to [`ProjectScope::fallback`].
    pub fn detect() -> Self {
        match detect_git_scope() {
            Some(scope) => scope,
            None => {
                debug!("No git scope detected, using fallback");
                Self::fallback()
            }
        }
    }

    /// The shared scope for directories without a git identity.
    pub fn fallback() -> Self {
        Self {
            repo: FALLBACK_REPO.to_string(),
            branch: FALLBACK_BRANCH.to_string(),
        }
    }
}

/// Read the remote URL and branch from git, or None if either is unavailable.
fn detect_git_scope() -> Option<ProjectScope> {
    let remote = git_stdout(&["remote", "get-url", "origin"])?;
    let branch = git_stdout(&["branch", "--show-current"])?;

    Some(ProjectScope {
        repo: normalize_remote_url(&remote),
        branch,
    })
}

/// Run a git subcommand and return its trimmed stdout on success.
fn git_stdout(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if !output.status.success() {
        return None;
    }

    stdout_text(output.stdout)
}

/// Decode captured stdout. Non-UTF8 output counts as unavailable; empty
/// output is kept (a detached HEAD reports an empty branch).
fn stdout_text(raw: Vec<u8>) -> Option<String> {
    let text = String::from_utf8(raw).ok()?;
    Some(text.trim().to_string())
}

/// Normalize a git remote URL into a canonical repository identifier.
///
/// SSH and HTTPS remotes of the same repository map to the same value:
/// `git@github.com:acme/widgets.git` and `https://github.com/acme/widgets.git`
/// both become `github.com/acme/widgets`. The user prefix is stripped after
/// the scheme, so `https://git@host/...` folds in as well.
pub fn normalize_remote_url(raw: &str) -> String {
    let url = raw.trim();
    let url = url.strip_prefix("https://").unwrap_or(url);
    let url = url.strip_prefix("git@").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.replacen(':', "/", 1)
}
