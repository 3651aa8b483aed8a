//! Hosted release records via the gh CLI

use crate::core::error::{GitError, MirrorError, MirrorResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Release hosting through `gh release`
///
/// Authentication is whatever `gh` is already configured with (GH_TOKEN in CI),
/// so the environment is passed through untouched.
pub struct GhCli {
  repo_path: PathBuf,
}

impl GhCli {
  pub fn new(repo_path: &Path) -> Self {
    Self {
      repo_path: repo_path.to_path_buf(),
    }
  }

  /// Create a release for an existing tag
  pub fn create_release(&self, tag: &str, notes: &str, latest: bool) -> MirrorResult<()> {
    let mut args = vec!["release", "create", tag, "--title", tag, "--notes", notes];
    if latest {
      args.push("--latest");
    }
    self.run(&args)
  }

  /// Delete a release together with its remote tag
  pub fn delete_release(&self, tag: &str) -> MirrorResult<()> {
    self.run(&["release", "delete", tag, "--cleanup-tag", "--yes"])
  }

  fn run(&self, args: &[&str]) -> MirrorResult<()> {
    let label = format!("gh {}", args.join(" "));
    let output = Command::new("gh")
      .current_dir(&self.repo_path)
      .args(args)
      .output()
      .map_err(|e| MirrorError::message(format!("Failed to execute {}: {}", label, e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(MirrorError::Git(GitError::CommandFailed {
        command: label,
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }
}
