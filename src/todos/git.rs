use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where report links point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    /// Browsable https URL of `origin`, without a `.git` suffix.
    pub remote_url: String,
    pub commit: String,
}

impl GitInfo {
    pub fn discover(dir: &Path) -> Result<Self> {
        let remote = run_git(dir, &["remote", "get-url", "origin"])?;
        let commit = run_git(dir, &["rev-parse", "HEAD"])?;
        Ok(Self {
            remote_url: browsable_remote(&remote),
            commit,
        })
    }

    pub fn short_commit(&self) -> &str {
        self.commit.get(..7).unwrap_or(&self.commit)
    }
}

/// Top-level directory of the repository containing `dir`.
pub fn repo_root(dir: &Path) -> Result<PathBuf> {
    run_git(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// `git@github.com:org/repo.git` => `https://github.com/org/repo`
pub fn browsable_remote(remote: &str) -> String {
    let url = match remote.strip_prefix("git@github.com:") {
        Some(rest) => format!("https://github.com/{rest}"),
        None => remote.to_string(),
    };
    match url.strip_suffix(".git") {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::Git {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::Git {
            command,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
