//! Core building blocks shared by every command
//!
//! - **config**: mirror.toml parsing and validation
//! - **error**: error categories with help messages and exit codes
//! - **forge**: hosted release records (gh CLI)
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod error;
pub mod forge;
pub mod vcs;
