//! Working-tree and remote operations used by the publish pipeline

use super::system_git::SystemGit;
use crate::core::error::{GitError, MirrorError, MirrorResult};
use std::path::PathBuf;

impl SystemGit {
  /// Porcelain status lines for the given paths (all paths when empty)
  pub fn status_porcelain(&self, paths: &[PathBuf]) -> MirrorResult<Vec<String>> {
    let output = self.run(&["status", "--porcelain"], paths)?;

    let lines = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|l| l.trim_end().to_string())
      .filter(|l| !l.is_empty())
      .collect();

    Ok(lines)
  }

  /// Check whether any of the paths differ from HEAD
  pub fn is_dirty(&self, paths: &[PathBuf]) -> MirrorResult<bool> {
    Ok(!self.status_porcelain(paths)?.is_empty())
  }

  /// Stage paths
  pub fn add(&self, paths: &[PathBuf]) -> MirrorResult<()> {
    self.run(&["add"], paths)?;
    Ok(())
  }

  /// Commit staged changes
  pub fn commit(&self, message: &str) -> MirrorResult<()> {
    self.run(&["commit", "--quiet", "-m", message], &[])?;
    Ok(())
  }

  /// Push a refspec to a remote
  pub fn push(&self, remote_name: &str, refspec: &str) -> MirrorResult<()> {
    let output = self
      .git_cmd()
      .args(["push", remote_name, refspec])
      .output()
      .map_err(|e| MirrorError::message(format!("Failed to execute git push: {}", e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(MirrorError::Git(GitError::PushFailed {
        remote: remote_name.to_string(),
        refspec: refspec.to_string(),
        reason: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Push one tag to a remote
  ///
  /// Only the named tag is sent, so stale local tags never reach the remote.
  /// With `force`, a tag already on the remote is moved.
  pub fn push_tag(&self, remote_name: &str, name: &str, force: bool) -> MirrorResult<()> {
    let refspec = format!("{}refs/tags/{}:refs/tags/{}", if force { "+" } else { "" }, name, name);
    self.push(remote_name, &refspec)
  }

  /// Delete a local tag; returns false when it did not exist
  pub fn delete_local_tag(&self, name: &str) -> MirrorResult<bool> {
    let output = self.run(&["tag", "--list", name], &[])?;
    if String::from_utf8_lossy(&output.stdout).trim().is_empty() {
      return Ok(false);
    }
    self.run(&["tag", "--delete", name], &[])?;
    Ok(true)
  }

  /// Delete a tag on a remote; returns false when it did not exist
  pub fn delete_remote_tag(&self, remote_name: &str, name: &str) -> MirrorResult<bool> {
    let tag_ref = format!("refs/tags/{}", name);
    let output = self.run(&["ls-remote", "--tags", remote_name, &tag_ref], &[])?;
    if String::from_utf8_lossy(&output.stdout).trim().is_empty() {
      return Ok(false);
    }
    self.push(remote_name, &format!(":{}", tag_ref))?;
    Ok(true)
  }

  /// Create a lightweight tag at HEAD
  ///
  /// With `force`, an existing tag of the same name is moved to HEAD.
  pub fn tag(&self, name: &str, force: bool) -> MirrorResult<()> {
    if force {
      self.run(&["tag", "--force", name], &[])?;
    } else {
      self.run(&["tag", name], &[])?;
    }
    Ok(())
  }
}
