//! Publisher backed by the system `git` and `gh` binaries

use super::Publisher;
use crate::core::error::MirrorResult;
use crate::core::forge::GhCli;
use crate::core::vcs::SystemGit;
use semver::Version;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct SystemPublisher {
  git: SystemGit,
  gh: GhCli,
  remote: String,
}

impl SystemPublisher {
  pub fn open(root: &Path, remote: impl Into<String>) -> MirrorResult<Self> {
    let git = SystemGit::open(root)?;
    let gh = GhCli::new(git.work_tree());
    Ok(Self {
      git,
      gh,
      remote: remote.into(),
    })
  }
}

impl Publisher for SystemPublisher {
  fn is_dirty(&self, paths: &[PathBuf]) -> MirrorResult<bool> {
    self.git.is_dirty(paths)
  }

  fn stage(&self, paths: &[PathBuf]) -> MirrorResult<()> {
    self.git.add(paths)
  }

  fn commit(&self, message: &str) -> MirrorResult<()> {
    self.git.commit(message)
  }

  fn push(&self, branch: &str) -> MirrorResult<()> {
    self.git.push(&self.remote, &format!("HEAD:refs/heads/{}", branch))
  }

  fn tag(&self, name: &str, force: bool) -> MirrorResult<()> {
    self.git.tag(name, force)
  }

  fn push_tag(&self, name: &str, force: bool) -> MirrorResult<()> {
    self.git.push_tag(&self.remote, name, force)
  }

  fn delete_tag(&self, name: &str) -> MirrorResult<()> {
    if self.git.delete_local_tag(name)? {
      debug!("deleted local tag {}", name);
    }
    if self.git.delete_remote_tag(&self.remote, name)? {
      debug!("deleted tag {} on {}", name, self.remote);
    }
    Ok(())
  }

  fn create_release(&self, version: &Version, notes: &str, latest: bool) -> MirrorResult<()> {
    self.gh.create_release(&version.to_string(), notes, latest)
  }

  fn delete_release(&self, version: &Version) -> MirrorResult<()> {
    self.gh.delete_release(&version.to_string())
  }
}
