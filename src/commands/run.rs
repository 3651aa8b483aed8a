//! `pin-mirror run`: reconcile and publish

use super::{MirrorContext, describe};
use crate::core::error::MirrorResult;
use crate::publish::{PublishPipeline, Publisher, RunReport, SystemPublisher};
use crate::registry::{PypiRegistry, ReleaseSource};
use std::path::Path;

/// Run the mirror against the live registry and the repository at `root`
pub fn run_mirror(root: &Path, config_path: Option<&Path>) -> MirrorResult<()> {
  let ctx = MirrorContext::build(root, config_path)?;
  let registry = PypiRegistry::new(ctx.config.upstream.index_url())?;
  let publisher = SystemPublisher::open(&ctx.root, ctx.config.mirror.remote.clone())?;

  let report = execute(&ctx, &registry, &publisher)?;
  print_report(&report);

  Ok(())
}

/// Decide and apply, with injected registry and publisher
pub fn execute<P: Publisher + ?Sized>(
  ctx: &MirrorContext,
  source: &dyn ReleaseSource,
  publisher: &P,
) -> MirrorResult<RunReport> {
  let (pinned, decision) = ctx.decide(source)?;
  println!("📦 {} {}: {}", ctx.config.upstream.package, pinned, describe(&decision));

  let patcher = ctx.patcher()?;
  let pipeline = PublishPipeline::new(
    publisher,
    &patcher,
    ctx.config.mirror.branch.clone(),
    ctx.config.upstream.release_url.clone(),
  );

  pipeline.execute(&decision)
}

fn print_report(report: &RunReport) {
  for version in &report.unchanged {
    println!("   No change {}", version);
  }

  if let Some((from, to)) = &report.rolled_back {
    println!("   ⏪ Rolled back yanked {} to {}", from, to);
  } else {
    for version in &report.published {
      println!("   ✅ Mirrored {}", version);
    }
  }

  if !report.warnings.is_empty() {
    println!();
    println!("⚠️  {} step(s) failed and were skipped:", report.warnings.len());
    for warning in &report.warnings {
      println!("   {}", warning);
    }
  }
}
