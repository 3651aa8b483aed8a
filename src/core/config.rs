use crate::core::error::{ConfigError, MirrorError, MirrorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the mirrored version in `release_url`
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Configuration for pin-mirror
/// Searched in order: mirror.toml, .mirror.toml, .config/mirror.toml
///
/// Every field has a default, so a repository without any config file mirrors
/// `uv` from PyPI into `pyproject.toml` and `README.md`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
  #[serde(default)]
  pub upstream: UpstreamConfig,
  #[serde(default)]
  pub mirror: RepoConfig,
}

/// The package being mirrored and where its releases live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
  /// Package name as published on the registry
  #[serde(default = "default_package")]
  pub package: String,

  /// JSON release index (default: `https://pypi.org/pypi/<package>/json`)
  #[serde(default)]
  pub index_url: Option<String>,

  /// Upstream release page, `{version}` is replaced with the mirrored version
  #[serde(default = "default_release_url")]
  pub release_url: String,
}

fn default_package() -> String {
  "uv".to_string()
}

fn default_release_url() -> String {
  "https://github.com/astral-sh/uv/releases/tag/{version}".to_string()
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      package: default_package(),
      index_url: None,
      release_url: default_release_url(),
    }
  }
}

impl UpstreamConfig {
  /// Release index URL, derived from the package name unless overridden
  pub fn index_url(&self) -> String {
    self
      .index_url
      .clone()
      .unwrap_or_else(|| format!("https://pypi.org/pypi/{}/json", self.package))
  }
}

/// The mirror repository: where to push and which files track the pin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
  #[serde(default = "default_remote")]
  pub remote: String,

  #[serde(default = "default_branch")]
  pub branch: String,

  /// Manifest holding the exact pin (relative to the repository root)
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,

  /// Documentation referencing the pinned version
  #[serde(default = "default_readme")]
  pub readme: PathBuf,
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_branch() -> String {
  "main".to_string()
}

fn default_manifest() -> PathBuf {
  PathBuf::from("pyproject.toml")
}

fn default_readme() -> PathBuf {
  PathBuf::from("README.md")
}

impl Default for RepoConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
      branch: default_branch(),
      manifest: default_manifest(),
      readme: default_readme(),
    }
  }
}

impl MirrorConfig {
  /// Find config file in search order: mirror.toml, .mirror.toml, .config/mirror.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("mirror.toml"),
      path.join(".mirror.toml"),
      path.join(".config").join("mirror.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config for a repository root
  ///
  /// An explicit path must exist. Without one, the search locations are tried
  /// and built-in defaults are used when none exists.
  pub fn load(root: &Path, explicit: Option<&Path>) -> MirrorResult<Self> {
    let config_path = match explicit {
      Some(path) => {
        let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        if !path.exists() {
          return Err(MirrorError::Config(ConfigError::NotFound { path }));
        }
        path
      }
      None => match Self::find_config_path(root) {
        Some(path) => path,
        None => {
          tracing::debug!("no mirror.toml found under {}, using defaults", root.display());
          return Ok(Self::default());
        }
      },
    };

    let content = fs::read_to_string(&config_path).map_err(|e| {
      MirrorError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;
    let config: MirrorConfig = toml_edit::de::from_str(&content).map_err(|e| {
      MirrorError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    config.validate()?;
    tracing::debug!("loaded config from {}", config_path.display());

    Ok(config)
  }

  /// Validate required fields
  pub fn validate(&self) -> MirrorResult<()> {
    let required = [
      ("upstream.package", self.upstream.package.as_str()),
      ("mirror.remote", self.mirror.remote.as_str()),
      ("mirror.branch", self.mirror.branch.as_str()),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(MirrorError::Config(ConfigError::MissingField {
          field: field.to_string(),
        }));
      }
    }

    if !self.upstream.release_url.contains(VERSION_PLACEHOLDER) {
      return Err(MirrorError::with_help(
        format!("upstream.release_url '{}' has no {} placeholder", self.upstream.release_url, VERSION_PLACEHOLDER),
        "Use a URL such as https://github.com/<owner>/<repo>/releases/tag/{version}",
      ));
    }

    Ok(())
  }
}
