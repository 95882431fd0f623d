//! Git subprocess operations.
//!
//! The status report, staging and index removal all go through the `git`
//! binary so they honour the user's hooks and configuration. Repository
//! discovery uses `git2`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use git2::Repository;
use tracing::{debug, info, warn};

use crate::errors::GitError;
use crate::status::PathRewriter;

/// Capability used by the resolver to update the index.
pub trait Index {
    /// Mark `path` as resolved (`git add`).
    fn stage(&mut self, path: &Path) -> Result<(), GitError>;

    /// Remove `path` from the index and the work tree (`git rm --quiet`).
    fn remove(&mut self, path: &Path) -> Result<(), GitError>;
}

/// Locate the work tree containing `start`.
///
/// Returns the repository and its canonical work tree root.
pub fn discover(start: &Path) -> Result<(Repository, PathBuf), GitError> {
    let repo = Repository::discover(start)
        .map_err(|_| GitError::RepositoryNotFound(start.display().to_string()))?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| GitError::RepositoryNotFound(start.display().to_string()))?
        .canonicalize()?;
    debug!(root = %workdir.display(), "discovered repository");
    Ok((repo, workdir))
}

/// Runs `git` commands from a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    cwd: PathBuf,
}

impl GitCli {
    /// `cwd` is both where commands run and what paths are relative to.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Path rewriter from the repository root to this client's directory.
    pub fn path_rewriter(&self, repo_root: &Path) -> Result<PathRewriter, GitError> {
        Ok(PathRewriter::new(repo_root, self.cwd.canonicalize()?))
    }

    /// Raw `git status --porcelain -z` report, excluding untracked files.
    pub fn status_report(&self) -> Result<Vec<u8>, GitError> {
        let output = self.run(&["status", "--porcelain", "-z", "--untracked-files=no"])?;
        debug!(bytes = output.stdout.len(), "read status report");
        Ok(output.stdout)
    }

    /// Run `git` with `args`, failing on a non-zero exit status.
    pub fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Output, GitError> {
        let words: Vec<_> = args.iter().map(|a| a.as_ref().to_string_lossy()).collect();
        let command_line = format!("git {}", words.join(" "));
        debug!(cmd = %command_line, "running git command");

        let output = Command::new("git")
            .current_dir(&self.cwd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GitError::BinaryNotFound("git".into())
                } else {
                    GitError::IoError(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, cmd = %command_line, "git command failed");
            return Err(GitError::CommandFailed {
                command: command_line,
                exit_code,
                stderr,
            });
        }
        Ok(output)
    }

    fn run_on_path(&self, args: &[&str], path: &Path) -> Result<(), GitError> {
        let mut full: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
        full.push(OsStr::new("--"));
        full.push(path.as_os_str());
        self.run(&full)?;
        Ok(())
    }
}

impl Index for GitCli {
    fn stage(&mut self, path: &Path) -> Result<(), GitError> {
        self.run_on_path(&["add"], path)?;
        info!(path = %path.display(), "staged");
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> Result<(), GitError> {
        self.run_on_path(&["rm", "--quiet"], path)?;
        info!(path = %path.display(), "removed");
        Ok(())
    }
}
