//! Idempotence guard between patching and publishing

use super::Publisher;
use crate::core::error::MirrorResult;
use std::path::PathBuf;
use tracing::debug;

/// Reports whether patching left a diff in the tracked files
///
/// No diff means the version is already reflected in the repository and the
/// pipeline must not commit, tag or release it again.
pub struct ChangeGate<'a, P: Publisher + ?Sized> {
  publisher: &'a P,
  paths: Vec<PathBuf>,
}

impl<'a, P: Publisher + ?Sized> ChangeGate<'a, P> {
  pub fn new(publisher: &'a P, paths: Vec<PathBuf>) -> Self {
    Self { publisher, paths }
  }

  pub fn has_changes(&self) -> MirrorResult<bool> {
    let dirty = self.publisher.is_dirty(&self.paths)?;
    debug!("working tree dirty for tracked files: {}", dirty);
    Ok(dirty)
  }
}
