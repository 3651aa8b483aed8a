//! Command implementations

pub mod plan;
pub mod run;

pub use plan::run_plan;
pub use run::run_mirror;

use crate::core::config::MirrorConfig;
use crate::core::error::MirrorResult;
use crate::manifest::PinReader;
use crate::patch::{ContentPatcher, TrackedFile};
use crate::reconcile::{Decision, reconcile};
use crate::registry::ReleaseSource;
use semver::Version;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Repository root and loaded configuration, built once per invocation
pub struct MirrorContext {
  pub root: PathBuf,
  pub config: MirrorConfig,
}

impl MirrorContext {
  pub fn build(root: &Path, config_path: Option<&Path>) -> MirrorResult<Self> {
    let config = MirrorConfig::load(root, config_path)?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(&self.config.mirror.manifest)
  }

  /// Files rewritten for every mirrored version
  pub fn patcher(&self) -> MirrorResult<ContentPatcher> {
    let package = &self.config.upstream.package;
    Ok(ContentPatcher::new(
      &self.root,
      vec![
        TrackedFile::manifest(&self.config.mirror.manifest, package)?,
        TrackedFile::readme(&self.config.mirror.readme, package)?,
      ],
    ))
  }

  /// Read the pin, fetch the catalog, and decide
  ///
  /// The pin is read first so a broken manifest never reaches the network.
  pub fn decide(&self, source: &dyn ReleaseSource) -> MirrorResult<(Version, Decision)> {
    let pinned = PinReader::new(&self.config.upstream.package).read(&self.manifest_path())?;
    info!("Current {} pin: {}", self.config.upstream.package, pinned);

    let catalog = source.fetch()?;
    if !catalog.contains(&pinned) {
      warn!("Pinned version {} is not listed by the registry", pinned);
    }

    let decision = reconcile(&catalog, &pinned)?;
    Ok((pinned, decision))
  }
}

/// One-line description of a decision for terminal output
pub(crate) fn describe(decision: &Decision) -> String {
  match decision {
    Decision::NoOp => "up to date".to_string(),
    Decision::Forward { versions } => {
      let list: Vec<String> = versions.iter().map(Version::to_string).collect();
      format!("mirror {}", list.join(", "))
    }
    Decision::Rollback { from, to } => format!("roll back yanked {} to {}", from, to),
  }
}
