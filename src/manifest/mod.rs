//! Reading the current pin from the manifest
//!
//! The manifest must carry exactly one `project.dependencies` entry for the
//! tracked package, constrained by a single `==` specifier. Anything else is a
//! misconfigured repository and aborts the run before any network traffic.

pub mod requirement;

use crate::core::error::{ManifestError, MirrorResult};
use requirement::Requirement;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;
use tracing::debug;

/// Extracts the pinned version of one package from a manifest
pub struct PinReader {
  package: String,
}

impl PinReader {
  pub fn new(package: impl Into<String>) -> Self {
    Self {
      package: package.into(),
    }
  }

  /// Read and parse the manifest at `path`
  pub fn read(&self, path: &Path) -> MirrorResult<Version> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Unreadable {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;
    Ok(self.parse(path, &content)?)
  }

  /// Extract the pin from manifest text; `path` is only used in errors
  pub fn parse(&self, path: &Path, content: &str) -> Result<Version, ManifestError> {
    let doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| ManifestError::Malformed {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;

    let dependencies = self.dependencies(path, &doc)?;

    let mut matches = Vec::new();
    for raw in dependencies {
      let requirement = Requirement::parse(&raw).map_err(|reason| ManifestError::InvalidRequirement {
        requirement: raw.clone(),
        reason,
      })?;
      if requirement.names(&self.package) {
        matches.push((raw, requirement));
      }
    }

    let (raw, requirement) = match matches.len() {
      0 => {
        return Err(ManifestError::DependencyNotFound {
          package: self.package.clone(),
        });
      }
      1 => matches.remove(0),
      count => {
        return Err(ManifestError::DuplicateDependency {
          package: self.package.clone(),
          count,
        });
      }
    };

    let specifier = match requirement.specifiers.as_slice() {
      [only] if only.is_exact() => only,
      _ => {
        return Err(ManifestError::NotExactPin {
          package: self.package.clone(),
          requirement: raw,
        });
      }
    };

    // Only the literal `<package>==<version>` form is rewritten on publish
    let expected = format!("{}=={}", self.package, specifier.version);
    if raw != expected {
      return Err(ManifestError::NonCanonicalPin {
        package: self.package.clone(),
        requirement: raw,
        expected,
      });
    }

    debug!("found requirement {}", requirement);

    Version::parse(&specifier.version).map_err(|_| ManifestError::InvalidVersion {
      package: self.package.clone(),
      version: specifier.version.clone(),
    })
  }

  fn dependencies(&self, path: &Path, doc: &DocumentMut) -> Result<Vec<String>, ManifestError> {
    let missing = || ManifestError::NoDependencies {
      path: PathBuf::from(path),
    };

    let array = doc
      .get("project")
      .and_then(|project| project.get("dependencies"))
      .and_then(|deps| deps.as_array())
      .ok_or_else(missing)?;

    array
      .iter()
      .map(|value| value.as_str().map(str::to_string).ok_or_else(missing))
      .collect()
  }
}
