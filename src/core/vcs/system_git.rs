//! System git backend
//!
//! Shells out to the `git` binary for every operation. The mirror only needs
//! a handful of porcelain commands (status, add, commit, push, tag), so there
//! is no library binding to keep in sync with the user's git.

use crate::core::error::{GitError, MirrorError, MirrorResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Variables git still sees after the environment is cleared
///
/// Commit identity and SSH transport are commonly injected this way in CI.
const PASSTHROUGH_ENV: [&str; 8] = [
  "PATH",
  "HOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

fn passthrough_env(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
  PASSTHROUGH_ENV
    .iter()
    .filter_map(|var| lookup(var).map(|value| (*var, value)))
    .collect()
}

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> MirrorResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(MirrorError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(MirrorError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists `PASSTHROUGH_ENV` (search path, identity, push transport)
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust ambient GIT_* variables)
    cmd.env_clear();
    cmd.envs(passthrough_env(|var| std::env::var(var).ok()));

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }

  /// Run a git command, mapping a non-zero exit to `GitError::CommandFailed`
  pub(crate) fn run(&self, args: &[&str], paths: &[PathBuf]) -> MirrorResult<Output> {
    let mut cmd = self.git_cmd();
    cmd.args(args);
    if !paths.is_empty() {
      cmd.arg("--");
      cmd.args(paths);
    }

    let label = format!("git {}", args.join(" "));
    let output = cmd.output().with_context(|| format!("Failed to execute {}", label))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(MirrorError::Git(GitError::CommandFailed {
        command: label,
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(output)
  }
}
