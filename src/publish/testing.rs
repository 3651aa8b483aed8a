//! Recording fake for the publisher, shared by unit tests

use super::{PublishStep, Publisher};
use crate::core::error::{MirrorError, MirrorResult};
use semver::Version;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
  Stage(Vec<PathBuf>),
  Commit(String),
  Push(String),
  Tag(String, bool),
  PushTag(String, bool),
  CreateRelease { version: String, notes: String, latest: bool },
  DeleteRelease(String),
  DeleteTag(String),
}

/// Publisher backed by a temp directory
///
/// "Committed" content is a snapshot taken on every commit; `is_dirty`
/// compares the files on disk against it, like `git status` would.
pub(crate) struct RecordingPublisher {
  dir: TempDir,
  committed: RefCell<BTreeMap<PathBuf, String>>,
  snapshots: RefCell<Vec<BTreeMap<PathBuf, String>>>,
  calls: RefCell<Vec<Call>>,
  failing: RefCell<Vec<PublishStep>>,
  fail_push_at: Cell<Option<usize>>,
  pushes: Cell<usize>,
}

impl RecordingPublisher {
  pub(crate) fn with_files(files: &[(&str, &str)]) -> Self {
    let dir = TempDir::new().unwrap();
    let mut committed = BTreeMap::new();
    for (path, content) in files {
      fs::write(dir.path().join(path), content).unwrap();
      committed.insert(PathBuf::from(path), content.to_string());
    }

    Self {
      dir,
      committed: RefCell::new(committed),
      snapshots: RefCell::new(Vec::new()),
      calls: RefCell::new(Vec::new()),
      failing: RefCell::new(Vec::new()),
      fail_push_at: Cell::new(None),
      pushes: Cell::new(0),
    }
  }

  pub(crate) fn root(&self) -> &Path {
    self.dir.path()
  }

  /// Make every call of `step` fail
  pub(crate) fn fail(&self, step: PublishStep) {
    self.failing.borrow_mut().push(step);
  }

  /// Make the n-th branch push (1-based) fail
  pub(crate) fn fail_push_at(&self, n: usize) {
    self.fail_push_at.set(Some(n));
  }

  pub(crate) fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  /// Content of `path` at each commit, in commit order
  pub(crate) fn committed_versions_of(&self, path: &str) -> Vec<String> {
    self
      .snapshots
      .borrow()
      .iter()
      .map(|snapshot| snapshot.get(Path::new(path)).cloned().unwrap_or_default())
      .collect()
  }

  fn read(&self, path: &Path) -> String {
    fs::read_to_string(self.dir.path().join(path)).unwrap_or_default()
  }

  fn check(&self, step: PublishStep) -> MirrorResult<()> {
    if self.failing.borrow().contains(&step) {
      return Err(MirrorError::message(format!("simulated {} failure", step)));
    }
    Ok(())
  }
}

impl Publisher for RecordingPublisher {
  fn is_dirty(&self, paths: &[PathBuf]) -> MirrorResult<bool> {
    let committed = self.committed.borrow();
    let paths: Vec<PathBuf> = if paths.is_empty() {
      committed.keys().cloned().collect()
    } else {
      paths.to_vec()
    };
    Ok(
      paths
        .iter()
        .any(|p| committed.get(p).map(String::as_str).unwrap_or("") != self.read(p)),
    )
  }

  fn stage(&self, paths: &[PathBuf]) -> MirrorResult<()> {
    self.check(PublishStep::Stage)?;
    self.calls.borrow_mut().push(Call::Stage(paths.to_vec()));
    Ok(())
  }

  fn commit(&self, message: &str) -> MirrorResult<()> {
    self.check(PublishStep::Commit)?;
    let snapshot: BTreeMap<PathBuf, String> = self
      .committed
      .borrow()
      .keys()
      .map(|p| (p.clone(), self.read(p)))
      .collect();
    *self.committed.borrow_mut() = snapshot.clone();
    self.snapshots.borrow_mut().push(snapshot);
    self.calls.borrow_mut().push(Call::Commit(message.to_string()));
    Ok(())
  }

  fn push(&self, branch: &str) -> MirrorResult<()> {
    self.check(PublishStep::PushBranch)?;
    let n = self.pushes.get() + 1;
    self.pushes.set(n);
    if self.fail_push_at.get() == Some(n) {
      return Err(MirrorError::message("simulated push rejection"));
    }
    self.calls.borrow_mut().push(Call::Push(branch.to_string()));
    Ok(())
  }

  fn tag(&self, name: &str, force: bool) -> MirrorResult<()> {
    self.check(PublishStep::Tag)?;
    self.calls.borrow_mut().push(Call::Tag(name.to_string(), force));
    Ok(())
  }

  fn push_tag(&self, name: &str, force: bool) -> MirrorResult<()> {
    self.check(PublishStep::PushTag)?;
    self.calls.borrow_mut().push(Call::PushTag(name.to_string(), force));
    Ok(())
  }

  fn delete_tag(&self, name: &str) -> MirrorResult<()> {
    self.check(PublishStep::DeleteTag)?;
    self.calls.borrow_mut().push(Call::DeleteTag(name.to_string()));
    Ok(())
  }

  fn create_release(&self, version: &Version, notes: &str, latest: bool) -> MirrorResult<()> {
    self.check(PublishStep::CreateRelease)?;
    self.calls.borrow_mut().push(Call::CreateRelease {
      version: version.to_string(),
      notes: notes.to_string(),
      latest,
    });
    Ok(())
  }

  fn delete_release(&self, version: &Version) -> MirrorResult<()> {
    self.check(PublishStep::DeleteRelease)?;
    self.calls.borrow_mut().push(Call::DeleteRelease(version.to_string()));
    Ok(())
  }
}
