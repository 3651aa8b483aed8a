//! Version reconciliation: what the mirror has to do this run
//!
//! Given the complete catalog and the current pin, decide between mirroring
//! newer releases forward, rolling back a yanked pin, or doing nothing. This is
//! a pure function of its inputs; the run holds no memory of earlier runs, so a
//! release yanked since the last run is noticed simply by re-fetching.

use crate::core::error::{MirrorError, MirrorResult};
use crate::registry::ReleaseCatalog;
use semver::Version;
use serde::Serialize;

/// Outcome of reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Decision {
  /// Mirror these versions, oldest first
  Forward { versions: Vec<Version> },
  /// The pin is yanked and nothing newer is valid: retreat to `to`
  Rollback { from: Version, to: Version },
  /// Pin is current and valid
  NoOp,
}

/// Decide what to mirror for `pinned`
///
/// - every non-yanked version strictly above the pin, ascending, if any
/// - otherwise, when the pinned release is yanked, the greatest non-yanked
///   version strictly below it
/// - otherwise nothing
///
/// A yanked pin with no valid version below it is an error; no target is
/// guessed.
pub fn reconcile(catalog: &ReleaseCatalog, pinned: &Version) -> MirrorResult<Decision> {
  let forward: Vec<Version> = catalog.non_yanked().filter(|v| *v > pinned).cloned().collect();

  if !forward.is_empty() {
    return Ok(Decision::Forward { versions: forward });
  }

  if !catalog.is_yanked(pinned) {
    return Ok(Decision::NoOp);
  }

  let target = catalog
    .non_yanked()
    .rev()
    .find(|v| *v < pinned)
    .cloned()
    .ok_or_else(|| MirrorError::RollbackInvariant { pinned: pinned.clone() })?;

  Ok(Decision::Rollback {
    from: pinned.clone(),
    to: target,
  })
}
