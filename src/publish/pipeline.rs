//! Applying a reconciliation decision: patch, gate, publish
//!
//! Versions are processed strictly one at a time. Each one is patched,
//! checked for a diff, committed, pushed, tagged and released before the next
//! one is patched, so the mirror's history follows upstream release order.

use super::{ChangeGate, Criticality, PublishStep, PublishWarning, Publisher};
use crate::core::config::VERSION_PLACEHOLDER;
use crate::core::error::{MirrorError, MirrorResult, PublishCriticalFailure};
use crate::patch::ContentPatcher;
use crate::reconcile::Decision;
use semver::Version;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  /// Versions committed and pushed, in publish order
  pub published: Vec<Version>,
  /// Versions whose patch produced no diff
  pub unchanged: Vec<Version>,
  /// `(from, to)` when a yanked pin was rolled back
  pub rolled_back: Option<(Version, Version)>,
  /// Best-effort steps that failed
  pub warnings: Vec<PublishWarning>,
}

/// Drives patching and publishing for one mirror repository
pub struct PublishPipeline<'a, P: Publisher + ?Sized> {
  publisher: &'a P,
  patcher: &'a ContentPatcher,
  branch: String,
  release_url: String,
}

impl<'a, P: Publisher + ?Sized> PublishPipeline<'a, P> {
  pub fn new(publisher: &'a P, patcher: &'a ContentPatcher, branch: impl Into<String>, release_url: impl Into<String>) -> Self {
    Self {
      publisher,
      patcher,
      branch: branch.into(),
      release_url: release_url.into(),
    }
  }

  /// Release notes pointing back at the upstream release
  pub fn notes_for(&self, version: &Version) -> String {
    format!("See: {}", self.release_url.replace(VERSION_PLACEHOLDER, &version.to_string()))
  }

  /// Carry out a decision
  ///
  /// Stops at the first must-succeed failure; versions published before it
  /// stay published.
  pub fn execute(&self, decision: &Decision) -> MirrorResult<RunReport> {
    let mut report = RunReport::default();

    match decision {
      Decision::NoOp => {
        info!("Pinned version is current, nothing to mirror");
      }
      Decision::Forward { versions } => {
        for version in versions {
          if !self.patch(version)? {
            info!("No change {}", version);
            report.unchanged.push(version.clone());
            continue;
          }

          self.commit_and_push(version, &format!("Mirror: {}", version))?;
          self.tag_and_release(version, false, &mut report);
          report.published.push(version.clone());
          info!("Mirrored {}", version);
        }
      }
      Decision::Rollback { from, to } => {
        if !self.patch(to)? {
          info!("No change {}", to);
          report.unchanged.push(to.clone());
          return Ok(report);
        }

        self.commit_and_push(to, &format!("Mirror: yanked {}", from))?;

        // Drop the yanked release, then recreate `to` on the new commit
        let from_tag = from.to_string();
        self.best_effort(PublishStep::DeleteRelease, from, &mut report, || {
          self.publisher.delete_release(from)
        });
        self.best_effort(PublishStep::DeleteTag, from, &mut report, || {
          self.publisher.delete_tag(&from_tag)
        });
        self.best_effort(PublishStep::DeleteRelease, to, &mut report, || self.publisher.delete_release(to));
        self.tag_and_release(to, true, &mut report);

        report.published.push(to.clone());
        report.rolled_back = Some((from.clone(), to.clone()));
        info!("Rolled back yanked {} to {}", from, to);
      }
    }

    Ok(report)
  }

  /// Patch tracked files and report whether the working tree changed
  fn patch(&self, version: &Version) -> MirrorResult<bool> {
    for file in self.patcher.apply(version)?.iter().filter(|f| f.changed) {
      debug!("{} rewritten for {}", file.path.display(), version);
    }
    ChangeGate::new(self.publisher, self.patcher.paths()).has_changes()
  }

  fn commit_and_push(&self, version: &Version, message: &str) -> MirrorResult<()> {
    let paths: Vec<PathBuf> = self.patcher.paths();
    self.must_succeed(PublishStep::Stage, version, || self.publisher.stage(&paths))?;
    self.must_succeed(PublishStep::Commit, version, || self.publisher.commit(message))?;
    self.must_succeed(PublishStep::PushBranch, version, || self.publisher.push(&self.branch))?;
    Ok(())
  }

  fn tag_and_release(&self, version: &Version, force_tag: bool, report: &mut RunReport) {
    let tag = version.to_string();
    let notes = self.notes_for(version);

    self.best_effort(PublishStep::Tag, version, report, || self.publisher.tag(&tag, force_tag));
    self.best_effort(PublishStep::PushTag, version, report, || {
      self.publisher.push_tag(&tag, force_tag)
    });
    self.best_effort(PublishStep::CreateRelease, version, report, || {
      self.publisher.create_release(version, &notes, true)
    });
  }

  fn must_succeed<F>(&self, step: PublishStep, version: &Version, f: F) -> MirrorResult<()>
  where
    F: FnOnce() -> MirrorResult<()>,
  {
    debug_assert_eq!(step.criticality(), Criticality::MustSucceed);
    f().map_err(|source| {
      MirrorError::Publish(PublishCriticalFailure {
        step,
        version: version.clone(),
        source: Box::new(source),
      })
    })?;
    debug!("{} {} ok", step, version);
    Ok(())
  }

  fn best_effort<F>(&self, step: PublishStep, version: &Version, report: &mut RunReport, f: F)
  where
    F: FnOnce() -> MirrorResult<()>,
  {
    debug_assert_eq!(step.criticality(), Criticality::BestEffort);
    match f() {
      Ok(()) => debug!("{} {} ok", step, version),
      Err(err) => {
        let warning = PublishWarning {
          step,
          version: version.clone(),
          reason: err.to_string(),
        };
        warn!("{}", warning);
        report.warnings.push(warning);
      }
    }
  }
}
