//! Integration tests for runs that must stop before publishing

use crate::helpers::{TestMirror, index_json, run_pin_mirror_raw, serve_index};
use anyhow::Result;

#[test]
fn test_yanked_pin_without_target_exits_with_validation_error() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", true)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("1.0.0"), "stderr: {}", stderr);

  assert_eq!(mirror.remote_log()?, vec!["Initial mirror".to_string()]);
  assert!(mirror.read_file("pyproject.toml")?.contains("\"uv==1.0.0\""));

  Ok(())
}

#[test]
fn test_range_requirement_fails_before_fetch() -> Result<()> {
  let mirror = TestMirror::with_dependency("uv>=1.0.0", "1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", false)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(server.hits(), 0);
  assert_eq!(mirror.remote_log()?, vec!["Initial mirror".to_string()]);

  Ok(())
}

#[test]
fn test_loosely_written_pin_fails_before_fetch() -> Result<()> {
  let mirror = TestMirror::with_dependency("UV == 1.0.0", "1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", false)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uv==1.0.0"), "stderr: {}", stderr);
  assert_eq!(server.hits(), 0);
  assert!(mirror.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_missing_dependency_fails_before_fetch() -> Result<()> {
  let mirror = TestMirror::with_dependency("ruff==0.5.0", "1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(server.hits(), 0);

  Ok(())
}

#[test]
fn test_registry_error_exits_with_system_error() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  let server = serve_index(503, "{}")?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(2));
  assert_eq!(server.hits(), 1);
  assert_eq!(mirror.remote_log()?, vec!["Initial mirror".to_string()]);

  Ok(())
}

#[test]
fn test_invalid_config_is_user_error() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  std::fs::write(mirror.path.join("mirror.toml"), "[upstream]\nunknown = true\n")?;

  let output = run_pin_mirror_raw(&mirror.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
