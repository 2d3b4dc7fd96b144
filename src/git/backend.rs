//! Version-control backend used by the relocation workflow
//!
//! The workflow only talks to the repository through [`VcsBackend`], which
//! keeps it testable against a recording mock. [`GitCli`] is the real
//! implementation and shells out to `git`.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use super::config::{get_branch_user_config, UserConfig};
use super::operations;

/// Operations the relocation workflow needs from the repository
///
/// Query methods never mutate the working tree. Every other method maps onto
/// exactly one externally visible git operation.
#[async_trait]
pub trait VcsBackend: Send + Sync {
    /// Whether the backend points at a valid working tree
    async fn is_inside_work_tree(&self) -> bool;

    /// Name of the checked-out branch, None on a detached HEAD
    async fn current_branch(&self) -> Option<String>;

    /// Whether tracked files have staged or unstaged changes
    async fn is_tree_dirty(&self) -> Result<bool>;

    /// User identity configured for commits on `branch`
    async fn configured_identity(&self, branch: &str) -> UserConfig;

    /// Whether a remote with this name exists
    async fn has_remote(&self, remote: &str) -> Result<bool>;

    async fn stash(&self, message: &str) -> Result<()>;

    async fn stash_apply(&self) -> Result<()>;

    async fn stash_drop(&self) -> Result<()>;

    async fn checkout(&self, branch: &str) -> Result<()>;

    async fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Stages `paths`, or everything when the slice is empty
    async fn add(&self, paths: &[String]) -> Result<()>;

    async fn commit(&self, author: Option<&str>, message: Option<&str>) -> Result<()>;

    async fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Unstages everything, discards changes to tracked files and removes
    /// files the latest stash entry added that are not tracked
    async fn reset_and_restore(&self) -> Result<()>;

    async fn rebase(&self, onto: &str) -> Result<()>;
}

/// Backend that runs the `git` executable inside a directory
#[derive(Clone, Debug)]
pub struct GitCli {
    path: PathBuf,
}

impl GitCli {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VcsBackend for GitCli {
    async fn is_inside_work_tree(&self) -> bool {
        operations::is_inside_work_tree(&self.path).await
    }

    async fn current_branch(&self) -> Option<String> {
        operations::get_current_branch(&self.path).await
    }

    async fn is_tree_dirty(&self) -> Result<bool> {
        operations::has_pending_changes(&self.path).await
    }

    async fn configured_identity(&self, branch: &str) -> UserConfig {
        get_branch_user_config(&self.path, branch).await
    }

    async fn has_remote(&self, remote: &str) -> Result<bool> {
        operations::remote_exists(&self.path, remote).await
    }

    async fn stash(&self, message: &str) -> Result<()> {
        operations::stash_push(&self.path, message).await
    }

    async fn stash_apply(&self) -> Result<()> {
        operations::stash_apply(&self.path).await
    }

    async fn stash_drop(&self) -> Result<()> {
        operations::stash_drop(&self.path).await
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        operations::checkout_branch(&self.path, branch).await
    }

    async fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        operations::pull_branch(&self.path, remote, branch).await
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        operations::stage_paths(&self.path, paths).await
    }

    async fn commit(&self, author: Option<&str>, message: Option<&str>) -> Result<()> {
        operations::commit_changes(&self.path, author, message).await
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        operations::push_branch(&self.path, remote, branch).await
    }

    async fn reset_and_restore(&self) -> Result<()> {
        operations::reset_and_restore(&self.path).await
    }

    async fn rebase(&self, onto: &str) -> Result<()> {
        operations::rebase_onto(&self.path, onto).await
    }
}
