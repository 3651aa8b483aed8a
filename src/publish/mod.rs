//! Publishing mirrored versions
//!
//! The side-effecting half of a run: commit and push the patched files, tag
//! the version, and keep hosted release records in step. Everything here goes
//! through the [`Publisher`] trait so the pipeline can be exercised against a
//! recording fake.
//!
//! Steps are split by criticality. Updating the default branch must succeed,
//! otherwise the working tree and the remote drift from the catalog already
//! consumed. Tags and release records are best effort: the branch already
//! carries the authoritative pin, so failures there become warnings.

pub mod gate;
pub mod pipeline;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

use crate::core::error::MirrorResult;
use semver::Version;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use gate::ChangeGate;
pub use pipeline::{PublishPipeline, RunReport};
pub use system::SystemPublisher;

/// Version-control and release-hosting operations used by the pipeline
pub trait Publisher {
  /// Whether any of `paths` differs from the last commit
  fn is_dirty(&self, paths: &[PathBuf]) -> MirrorResult<bool>;

  fn stage(&self, paths: &[PathBuf]) -> MirrorResult<()>;

  fn commit(&self, message: &str) -> MirrorResult<()>;

  /// Push HEAD to `branch` on the mirror remote
  fn push(&self, branch: &str) -> MirrorResult<()>;

  /// Tag HEAD; `force` moves an existing tag
  fn tag(&self, name: &str, force: bool) -> MirrorResult<()>;

  /// Push a single tag; `force` replaces a tag already on the remote
  fn push_tag(&self, name: &str, force: bool) -> MirrorResult<()>;

  /// Remove a tag locally and on the remote; an absent tag is not an error
  fn delete_tag(&self, name: &str) -> MirrorResult<()>;

  fn create_release(&self, version: &Version, notes: &str, latest: bool) -> MirrorResult<()>;

  /// Delete the hosted release and its remote tag
  fn delete_release(&self, version: &Version) -> MirrorResult<()>;
}

/// Whether a failed step aborts the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
  MustSucceed,
  BestEffort,
}

/// One side-effecting step of publishing a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishStep {
  Stage,
  Commit,
  PushBranch,
  Tag,
  PushTag,
  CreateRelease,
  DeleteRelease,
  DeleteTag,
}

impl PublishStep {
  pub fn criticality(self) -> Criticality {
    match self {
      PublishStep::Stage | PublishStep::Commit | PublishStep::PushBranch => Criticality::MustSucceed,
      PublishStep::Tag
      | PublishStep::PushTag
      | PublishStep::CreateRelease
      | PublishStep::DeleteRelease
      | PublishStep::DeleteTag => Criticality::BestEffort,
    }
  }
}

impl fmt::Display for PublishStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      PublishStep::Stage => "stage",
      PublishStep::Commit => "commit",
      PublishStep::PushBranch => "push branch",
      PublishStep::Tag => "tag",
      PublishStep::PushTag => "push tag",
      PublishStep::CreateRelease => "create release",
      PublishStep::DeleteRelease => "delete release",
      PublishStep::DeleteTag => "delete tag",
    };
    f.write_str(name)
  }
}

/// A best-effort step that failed and was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishWarning {
  pub step: PublishStep,
  pub version: Version,
  pub reason: String,
}

impl fmt::Display for PublishWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} failed: {}", self.step, self.version, self.reason)
  }
}
