//! Error types for pin-mirror with contextual messages and exit codes
//!
//! Every fatal condition of a mirror run maps onto one category here. Each
//! category carries its own exit code and, where useful, a help message that
//! points the user at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::publish::PublishStep;

/// Exit codes for pin-mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, manifest, invalid args)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Registry state the mirror cannot reconcile
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pin-mirror
#[derive(Debug)]
pub enum MirrorError {
  /// Configuration errors
  Config(ConfigError),

  /// Manifest pin errors
  Manifest(ManifestError),

  /// Release index fetch/decode errors
  Registry(RegistryError),

  /// The pinned release is yanked and nothing valid precedes it
  RollbackInvariant { pinned: semver::Version },

  /// A must-succeed publish step failed
  Publish(PublishCriticalFailure),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl MirrorError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    MirrorError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    MirrorError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      MirrorError::Message { message, context, help } => MirrorError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      MirrorError::Io(err) => MirrorError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      MirrorError::Config(_) => ExitCode::User,
      MirrorError::Manifest(_) => ExitCode::User,
      MirrorError::Registry(_) => ExitCode::System,
      MirrorError::RollbackInvariant { .. } => ExitCode::Validation,
      MirrorError::Publish(_) => ExitCode::System,
      MirrorError::Git(_) => ExitCode::System,
      MirrorError::Io(_) => ExitCode::System,
      MirrorError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      MirrorError::Config(e) => e.help_message(),
      MirrorError::Manifest(e) => e.help_message(),
      MirrorError::Registry(e) => e.help_message(),
      MirrorError::RollbackInvariant { .. } => Some(
        "Every release at or below the pin is yanked. Pin a valid release by hand before the next run.".to_string(),
      ),
      MirrorError::Publish(e) => e.help_message(),
      MirrorError::Git(e) => e.help_message(),
      MirrorError::Message { help, .. } => help.clone(),
      MirrorError::Io(_) => None,
    }
  }
}

impl fmt::Display for MirrorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MirrorError::Config(e) => write!(f, "{}", e),
      MirrorError::Manifest(e) => write!(f, "{}", e),
      MirrorError::Registry(e) => write!(f, "{}", e),
      MirrorError::RollbackInvariant { pinned } => write!(
        f,
        "Pinned release {} is yanked and no earlier non-yanked release exists to roll back to",
        pinned
      ),
      MirrorError::Publish(e) => write!(f, "{}", e),
      MirrorError::Git(e) => write!(f, "{}", e),
      MirrorError::Io(e) => write!(f, "I/O error: {}", e),
      MirrorError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for MirrorError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      MirrorError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for MirrorError {
  fn from(err: io::Error) -> Self {
    MirrorError::Io(err)
  }
}

impl From<String> for MirrorError {
  fn from(msg: String) -> Self {
    MirrorError::message(msg)
  }
}

impl From<&str> for MirrorError {
  fn from(msg: &str) -> Self {
    MirrorError::message(msg)
  }
}

impl From<ManifestError> for MirrorError {
  fn from(err: ManifestError) -> Self {
    MirrorError::Manifest(err)
  }
}

impl From<RegistryError> for MirrorError {
  fn from(err: RegistryError) -> Self {
    MirrorError::Registry(err)
  }
}

impl From<ConfigError> for MirrorError {
  fn from(err: ConfigError) -> Self {
    MirrorError::Config(err)
  }
}

impl From<GitError> for MirrorError {
  fn from(err: GitError) -> Self {
    MirrorError::Git(err)
  }
}

impl From<toml_edit::de::Error> for MirrorError {
  fn from(err: toml_edit::de::Error) -> Self {
    MirrorError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for MirrorError {
  fn from(err: serde_json::Error) -> Self {
    MirrorError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for MirrorError {
  fn from(err: regex::Error) -> Self {
    MirrorError::message(format!("Invalid substitution pattern: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicit config path does not exist
  NotFound { path: PathBuf },

  /// Config file could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// Missing or empty required field
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Drop --config to use mirror.toml from the repository root, or built-in defaults.".to_string())
      }
      ConfigError::Invalid { .. } => Some("Check mirror.toml against the [upstream] and [mirror] tables.".to_string()),
      ConfigError::MissingField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Config file not found: {}", path.display()),
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid config in {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field } => write!(f, "Missing required field in config: {}", field),
    }
  }
}

/// Manifest pin errors
///
/// Any of these means the repository is misconfigured: the mirror needs a
/// single, exact pin to reason about.
#[derive(Debug)]
pub enum ManifestError {
  /// Manifest could not be read from disk
  Unreadable { path: PathBuf, reason: String },

  /// Manifest is not valid TOML
  Malformed { path: PathBuf, reason: String },

  /// `project.dependencies` missing or not a list of strings
  NoDependencies { path: PathBuf },

  /// Tracked package not declared
  DependencyNotFound { package: String },

  /// Tracked package declared more than once
  DuplicateDependency { package: String, count: usize },

  /// Requirement is not a single `==` specifier
  NotExactPin { package: String, requirement: String },

  /// Exact pin written in a form the manifest rewrite rule does not match
  NonCanonicalPin {
    package: String,
    requirement: String,
    expected: String,
  },

  /// Requirement string could not be parsed
  InvalidRequirement { requirement: String, reason: String },

  /// Pinned version is not a semantic version
  InvalidVersion { package: String, version: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::DependencyNotFound { package } => Some(format!(
        "Add an exact pin to project.dependencies, e.g. \"{}==0.1.0\"",
        package
      )),
      ManifestError::DuplicateDependency { package, .. } => {
        Some(format!("Keep a single \"{}==<version>\" entry in project.dependencies", package))
      }
      ManifestError::NotExactPin { package, .. } => Some(format!(
        "The mirror only tracks exact pins. Use \"{}==<version>\" with no other constraints.",
        package
      )),
      ManifestError::NonCanonicalPin { expected, .. } => Some(format!(
        "Write the entry exactly as \"{}\": no spaces, extras or markers, and the package name as configured.",
        expected
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::Unreadable { path, reason } => {
        write!(f, "Failed to read manifest {}: {}", path.display(), reason)
      }
      ManifestError::Malformed { path, reason } => {
        write!(f, "Failed to parse manifest {}: {}", path.display(), reason)
      }
      ManifestError::NoDependencies { path } => {
        write!(f, "Manifest {} has no project.dependencies list", path.display())
      }
      ManifestError::DependencyNotFound { package } => {
        write!(f, "Manifest does not declare a '{}' requirement", package)
      }
      ManifestError::DuplicateDependency { package, count } => {
        write!(f, "Manifest declares '{}' {} times, expected exactly once", package, count)
      }
      ManifestError::NotExactPin { package, requirement } => {
        write!(f, "{}'s specifier should be exact matching, but `{}`", package, requirement)
      }
      ManifestError::NonCanonicalPin {
        package, requirement, ..
      } => {
        write!(f, "{} pin `{}` cannot be rewritten by the mirror", package, requirement)
      }
      ManifestError::InvalidRequirement { requirement, reason } => {
        write!(f, "Invalid requirement `{}`: {}", requirement, reason)
      }
      ManifestError::InvalidVersion { package, version } => {
        write!(f, "Pinned {} version '{}' is not a semantic version", package, version)
      }
    }
  }
}

/// Release index errors
#[derive(Debug)]
pub enum RegistryError {
  /// Request could not be sent or the body could not be read
  Transport { url: String, reason: String },

  /// Endpoint answered with a non-success status
  Status { url: String, status: u16 },

  /// Body is not a release index
  Decode { url: String, reason: String },
}

impl RegistryError {
  fn help_message(&self) -> Option<String> {
    match self {
      RegistryError::Status { status: 404, .. } => {
        Some("Check [upstream].package and [upstream].index_url in mirror.toml".to_string())
      }
      RegistryError::Transport { .. } => Some("Check network access to the registry and retry the run.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryError::Transport { url, reason } => {
        write!(f, "Failed to fetch versions from {}: {}", url, reason)
      }
      RegistryError::Status { url, status } => {
        write!(f, "Failed to fetch versions from {}: HTTP {}", url, status)
      }
      RegistryError::Decode { url, reason } => {
        write!(f, "Release index from {} is not valid: {}", url, reason)
      }
    }
  }
}

/// A must-succeed publish step failed, the queue stops here
#[derive(Debug)]
pub struct PublishCriticalFailure {
  pub step: PublishStep,
  pub version: semver::Version,
  pub source: Box<MirrorError>,
}

impl PublishCriticalFailure {
  fn help_message(&self) -> Option<String> {
    self
      .source
      .help_message()
      .or_else(|| Some("Versions published before this one remain published; rerun once the remote is reachable.".to_string()))
  }
}

impl fmt::Display for PublishCriticalFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Publishing {} failed at step '{}': {}", self.version, self.step, self.source)
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull before the next run.".to_string())
        } else if reason.contains("Permission denied") || reason.contains("403") {
          Some("Check the credentials the job pushes with.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!("Run pin-mirror inside a git checkout: {}", path.display())),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason)
      }
    }
  }
}

/// Result type alias for pin-mirror
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> MirrorResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> MirrorResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<MirrorError>,
{
  fn context(self, ctx: impl Into<String>) -> MirrorResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> MirrorResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &MirrorError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
