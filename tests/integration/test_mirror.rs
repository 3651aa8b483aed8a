//! Integration tests for `pin-mirror run`

use crate::helpers::{TestMirror, index_json, run_pin_mirror, serve_index};
use anyhow::Result;

#[test]
fn test_forward_publishes_each_version() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", false), ("1.2.0", false)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror(&mirror.path, &["run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Mirrored 1.1.0"), "stdout: {}", stdout);
  assert!(stdout.contains("Mirrored 1.2.0"), "stdout: {}", stdout);

  // One commit per version, oldest first
  let log = mirror.remote_log()?;
  assert_eq!(log[0], "Mirror: 1.2.0");
  assert_eq!(log[1], "Mirror: 1.1.0");

  assert_eq!(mirror.remote_tags()?, vec!["1.1.0".to_string(), "1.2.0".to_string()]);
  assert_ne!(mirror.remote_rev("1.1.0")?, mirror.remote_rev("1.2.0")?);

  let manifest = mirror.read_file("pyproject.toml")?;
  assert!(manifest.contains("\"uv==1.2.0\""));
  let readme = mirror.read_file("README.md")?;
  assert!(readme.contains("rev: 1.2.0"));
  assert!(readme.contains("/uv/1.2.0.svg"));

  Ok(())
}

#[test]
fn test_up_to_date_changes_nothing() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.1.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", false)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror(&mirror.path, &[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("up to date"), "stdout: {}", stdout);

  assert_eq!(mirror.remote_log()?, vec!["Initial mirror".to_string()]);
  assert!(mirror.remote_tags()?.is_empty());
  assert_eq!(server.hits(), 1);

  Ok(())
}

#[test]
fn test_second_run_is_noop() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", false)]))?;
  mirror.use_index(&server.url)?;

  run_pin_mirror(&mirror.path, &["run"])?;
  let after_first = mirror.remote_log()?;

  run_pin_mirror(&mirror.path, &["run"])?;
  assert_eq!(mirror.remote_log()?, after_first);

  Ok(())
}

#[test]
fn test_yanked_pin_rolls_back() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.1.0")?;
  mirror.tag_and_push("1.0.0")?;
  mirror.tag_and_push("1.1.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", true)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror(&mirror.path, &["run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Rolled back yanked 1.1.0 to 1.0.0"), "stdout: {}", stdout);

  assert_eq!(mirror.remote_log()?[0], "Mirror: yanked 1.1.0");
  assert!(mirror.read_file("pyproject.toml")?.contains("\"uv==1.0.0\""));
  assert!(mirror.read_file("README.md")?.contains("rev: 1.0.0"));

  // The yanked tag is gone everywhere, whether or not its release record could be deleted
  assert_eq!(mirror.remote_tags()?, vec!["1.0.0".to_string()]);
  assert!(!mirror.local_tags()?.contains(&"1.1.0".to_string()));

  // The tag for the rollback target was moved onto the rollback commit
  assert_eq!(mirror.remote_rev("1.0.0")?, mirror.remote_rev("main")?);

  Ok(())
}
