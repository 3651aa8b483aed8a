//! Integration tests for `pin-mirror plan`

use crate::helpers::{TestMirror, index_json, run_pin_mirror, serve_index};
use anyhow::Result;

#[test]
fn test_plan_json_lists_pending_versions() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.0.0")?;
  let server = serve_index(
    200,
    &index_json(&[("1.0.0", false), ("1.1.0", false), ("1.2.0", true), ("1.3.0", false)]),
  )?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror(&mirror.path, &["plan", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["package"], "uv");
  assert_eq!(plan["pinned"], "1.0.0");
  assert_eq!(plan["action"], "forward");
  assert_eq!(plan["versions"], serde_json::json!(["1.1.0", "1.3.0"]));

  // Planning never touches the repository
  assert!(mirror.read_file("pyproject.toml")?.contains("\"uv==1.0.0\""));
  assert_eq!(mirror.remote_log()?, vec!["Initial mirror".to_string()]);

  Ok(())
}

#[test]
fn test_plan_reports_rollback() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.1.0")?;
  let server = serve_index(200, &index_json(&[("1.0.0", false), ("1.1.0", true)]))?;
  mirror.use_index(&server.url)?;

  let output = run_pin_mirror(&mirror.path, &["plan", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["action"], "rollback");
  assert_eq!(plan["from"], "1.1.0");
  assert_eq!(plan["to"], "1.0.0");

  Ok(())
}

#[test]
fn test_directory_flag_selects_repository() -> Result<()> {
  let mirror = TestMirror::pinned_at("1.1.0")?;
  let server = serve_index(200, &index_json(&[("1.1.0", false)]))?;
  mirror.use_index(&server.url)?;

  let dir = mirror.path.to_string_lossy().to_string();
  let output = run_pin_mirror(std::env::temp_dir().as_path(), &["-C", &dir, "plan"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("up to date"), "stdout: {}", stdout);

  Ok(())
}
