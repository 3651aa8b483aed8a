//! Release history of the upstream package
//!
//! Built fresh from the registry index on every run; the yanked flag of a
//! release may change between runs and nothing here is cached.

use crate::core::error::RegistryError;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One distribution file of a release
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Asset {
  #[serde(default)]
  pub filename: Option<String>,
  #[serde(default)]
  pub yanked: bool,
}

/// A published version and its distribution files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
  pub version: Version,
  pub assets: Vec<Asset>,
}

impl Release {
  /// A release is yanked as soon as any of its files is
  pub fn is_yanked(&self) -> bool {
    self.assets.iter().any(|a| a.yanked)
  }
}

/// Every version the registry has published, ordered by version
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
  releases: BTreeMap<Version, Release>,
}

/// Registry JSON index: `{"releases": {"<version>": [<asset>, ...]}}`
#[derive(Debug, Deserialize)]
struct ReleaseIndex {
  releases: BTreeMap<String, Vec<Asset>>,
}

impl ReleaseCatalog {
  /// Build a catalog from already-decoded releases
  pub fn from_releases(releases: impl IntoIterator<Item = Release>) -> Self {
    Self {
      releases: releases.into_iter().map(|r| (r.version.clone(), r)).collect(),
    }
  }

  /// Decode a registry JSON index
  ///
  /// Version keys that are not semantic versions are skipped.
  pub fn from_index_json(url: &str, body: &str) -> Result<Self, RegistryError> {
    let index: ReleaseIndex = serde_json::from_str(body).map_err(|e| RegistryError::Decode {
      url: url.to_string(),
      reason: e.to_string(),
    })?;

    let releases = index
      .releases
      .into_iter()
      .filter_map(|(raw, assets)| match Version::parse(&raw) {
        Ok(version) => Some(Release { version, assets }),
        Err(e) => {
          tracing::debug!("skipping release '{}': {}", raw, e);
          None
        }
      });

    Ok(Self::from_releases(releases))
  }

  pub fn contains(&self, version: &Version) -> bool {
    self.releases.contains_key(version)
  }

  /// Whether the release at `version` is yanked (false when unknown)
  pub fn is_yanked(&self, version: &Version) -> bool {
    self.releases.get(version).is_some_and(Release::is_yanked)
  }

  /// Non-yanked versions in ascending order
  pub fn non_yanked(&self) -> impl DoubleEndedIterator<Item = &Version> {
    self.releases.values().filter(|r| !r.is_yanked()).map(|r| &r.version)
  }

  pub fn len(&self) -> usize {
    self.releases.len()
  }

  pub fn is_empty(&self) -> bool {
    self.releases.is_empty()
  }
}
