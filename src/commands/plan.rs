//! `pin-mirror plan`: show the decision without side effects

use super::{MirrorContext, describe};
use crate::core::error::MirrorResult;
use crate::reconcile::Decision;
use crate::registry::PypiRegistry;
use semver::Version;
use serde::Serialize;
use std::path::Path;

/// Plan output
#[derive(Debug, Serialize)]
pub struct MirrorPlan {
  pub package: String,
  pub pinned: Version,
  #[serde(flatten)]
  pub decision: Decision,
}

/// Print what a run would do
pub fn run_plan(root: &Path, config_path: Option<&Path>, json: bool) -> MirrorResult<()> {
  let ctx = MirrorContext::build(root, config_path)?;
  let registry = PypiRegistry::new(ctx.config.upstream.index_url())?;
  let (pinned, decision) = ctx.decide(&registry)?;

  let plan = MirrorPlan {
    package: ctx.config.upstream.package.clone(),
    pinned,
    decision,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
  } else {
    print_plan(&plan);
  }

  Ok(())
}

fn print_plan(plan: &MirrorPlan) {
  println!("📋 Mirror plan for {}", plan.package);
  println!();
  println!("   Pinned:   {}", plan.pinned);
  println!("   Action:   {}", describe(&plan.decision));

  match &plan.decision {
    Decision::Forward { versions } => {
      println!();
      println!("   Will publish, in order:");
      for version in versions {
        println!("     - {}", version);
      }
    }
    Decision::Rollback { from, .. } => {
      println!();
      println!("   Release {} is yanked upstream; its tag and release will be removed", from);
    }
    Decision::NoOp => {}
  }
}
