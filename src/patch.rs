//! Rewriting the pinned version in tracked files
//!
//! Each tracked file has a fixed set of substitution rules. A rule's pattern
//! always matches its own replacement in full, so patching a file that already
//! names the target version leaves it byte-identical.

use crate::core::error::{MirrorResult, ResultExt};
use regex::{NoExpand, Regex};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// A semantic version as it appears in text, prerelease and build included
const VERSION_PATTERN: &str = r"\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?";

/// Replace every match of `pattern` with `template`, `{version}` filled in
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
  pattern: Regex,
  template: String,
}

impl SubstitutionRule {
  pub fn new(pattern: &str, template: impl Into<String>) -> MirrorResult<Self> {
    Ok(Self {
      pattern: Regex::new(pattern)?,
      template: template.into(),
    })
  }

  pub fn apply(&self, content: &str, version: &Version) -> String {
    let replacement = self.template.replace("{version}", &version.to_string());
    self.pattern.replace_all(content, NoExpand(&replacement)).into_owned()
  }
}

/// A file whose content follows the pinned version
#[derive(Debug, Clone)]
pub struct TrackedFile {
  pub path: PathBuf,
  pub rules: Vec<SubstitutionRule>,
}

impl TrackedFile {
  /// `"<package>==<version>"` inside the dependency list
  pub fn manifest(path: impl Into<PathBuf>, package: &str) -> MirrorResult<Self> {
    let escaped = regex::escape(package);
    Ok(Self {
      path: path.into(),
      rules: vec![SubstitutionRule::new(
        &format!(r#""{}==[^"]*""#, escaped),
        format!(r#""{}=={{version}}""#, package),
      )?],
    })
  }

  /// Hook `rev: <version>` lines and the `/<package>/<version>.svg` badge
  pub fn readme(path: impl Into<PathBuf>, package: &str) -> MirrorResult<Self> {
    let escaped = regex::escape(package);
    Ok(Self {
      path: path.into(),
      rules: vec![
        SubstitutionRule::new(&format!("rev: {}", VERSION_PATTERN), "rev: {version}")?,
        SubstitutionRule::new(
          &format!(r"/{}/{}\.svg", escaped, VERSION_PATTERN),
          format!("/{}/{{version}}.svg", package),
        )?,
      ],
    })
  }

  /// Content after every rule has been applied
  pub fn render(&self, content: &str, version: &Version) -> String {
    self
      .rules
      .iter()
      .fold(content.to_string(), |acc, rule| rule.apply(&acc, version))
  }
}

/// Result of patching one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
  pub path: PathBuf,
  pub changed: bool,
}

/// Applies a target version to the tracked files of a repository
pub struct ContentPatcher {
  root: PathBuf,
  files: Vec<TrackedFile>,
}

impl ContentPatcher {
  pub fn new(root: &Path, files: Vec<TrackedFile>) -> Self {
    Self {
      root: root.to_path_buf(),
      files,
    }
  }

  /// Tracked paths, relative to the repository root
  pub fn paths(&self) -> Vec<PathBuf> {
    self.files.iter().map(|f| f.path.clone()).collect()
  }

  /// Rewrite every tracked file for `version`
  ///
  /// Files are only written when their content changes.
  pub fn apply(&self, version: &Version) -> MirrorResult<Vec<PatchedFile>> {
    let mut patched = Vec::with_capacity(self.files.len());

    for file in &self.files {
      let full_path = self.root.join(&file.path);
      let content =
        fs::read_to_string(&full_path).with_context(|| format!("Failed to read {}", full_path.display()))?;

      let updated = file.render(&content, version);
      let changed = updated != content;
      if changed {
        fs::write(&full_path, &updated).with_context(|| format!("Failed to write {}", full_path.display()))?;
      }

      patched.push(PatchedFile {
        path: file.path.clone(),
        changed,
      });
    }

    Ok(patched)
  }
}
