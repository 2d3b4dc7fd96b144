//! # tele-scope
//!
//! `tele-scope` moves uncommitted changes from the branch you are working on
//! onto an upstream branch, commits and publishes them there, and brings the
//! working branch back rebased on top. It powers the `tele-scope` CLI tool.
//!
//! ## Workflow
//!
//! 1. Stash the pending changes and check out the upstream branch
//! 2. Apply the stash, commit (optionally only some paths) and push
//! 3. Return to the local branch, rebase it onto upstream, re-apply whatever
//!    was not relocated and drop the stash
//!
//! Any failing step stops the run and leaves the stash in place.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tele_scope::core::RelocateConfig;
//! use tele_scope::git::GitCli;
//! use tele_scope::workflow::relocate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RelocateConfig::builder()
//!         .upstream_branch("main")
//!         .message(Some("Fix typo in README".to_string()))
//!         .build()?;
//!     let outcome = relocate(&GitCli::new("."), &config).await;
//!     std::process::exit(outcome.exit_code().into());
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod git;
pub mod utils;
pub mod workflow;
