//! Version-control metadata for recording where a config came from.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use serde::Serialize;
use tracing::{debug, warn};

/// Repository state around a file. All fields are `None` when the probe fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VcsInfo {
    /// Fetch URL of the `origin` remote
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
}

impl VcsInfo {
    pub fn is_empty(&self) -> bool {
        self.remote.is_none() && self.branch.is_none() && self.commit.is_none()
    }
}

/// Queries git in the directory containing `path`.
///
/// Never fails: if git is missing, the path is not inside a work tree or the
/// origin remote cannot be read, the result is all `None` and a warning is
/// logged.
pub fn probe(path: impl AsRef<Path>) -> VcsInfo {
    let dir = working_dir(path.as_ref());
    match try_probe(&dir) {
        Ok(info) => {
            debug!(dir = %dir.display(), commit = ?info.commit, "Probed repository");
            info
        }
        Err(reason) => {
            warn!(dir = %dir.display(), %reason, "Could not read version-control info");
            VcsInfo::default()
        }
    }
}

fn working_dir(path: &Path) -> PathBuf {
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    }
}

fn try_probe(dir: &Path) -> Result<VcsInfo, String> {
    let commit = git(dir, &["rev-parse", "HEAD"])?;
    let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let remotes = git(dir, &["remote", "-v"])?;
    let remote = origin_fetch_url(&remotes).ok_or("no origin fetch remote")?;
    Ok(VcsInfo {
        remote: Some(remote),
        branch: Some(branch),
        commit: Some(commit),
    })
}

fn git(dir: &Path, args: &[&str]) -> Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| format!("failed to run git: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Picks the URL from an `origin <url> (fetch)` line of `git remote -v`.
fn origin_fetch_url(remotes: &str) -> Option<String> {
    remotes.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some("origin"), Some(url), Some("(fetch)")) => Some(url.to_string()),
            _ => None,
        }
    })
}
