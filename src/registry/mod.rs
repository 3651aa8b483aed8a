//! Upstream release history
//!
//! The catalog is the complete, current view of what the registry has
//! published. Reconciliation needs all of it (finding "the greatest valid
//! version below the pin" is meaningless on a partial view), so any fetch
//! failure is fatal.

pub mod catalog;
pub mod pypi;

use crate::core::error::MirrorResult;

pub use catalog::ReleaseCatalog;
pub use pypi::PypiRegistry;

/// Where the release catalog comes from
pub trait ReleaseSource {
  fn fetch(&self) -> MirrorResult<ReleaseCatalog>;
}

/// Fixed catalog, returned as-is on every fetch
impl ReleaseSource for ReleaseCatalog {
  fn fetch(&self) -> MirrorResult<ReleaseCatalog> {
    Ok(self.clone())
  }
}
