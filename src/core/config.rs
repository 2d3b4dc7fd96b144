//! Configuration constants and the relocation configuration value

use anyhow::Result;
use std::fmt;

use crate::git::{validate_user_config, UserConfig};

// Defaults
pub const DEFAULT_UPSTREAM_BRANCH: &str = "master";
pub const DEFAULT_REMOTE: &str = "origin";

// Remote names that disable pushing
pub const DISABLED_REMOTE_SENTINEL: &str = "--";
pub const DISABLED_REMOTE_ALIAS: &str = "none";

// Environment overrides for the defaults above
pub const BRANCH_ENV_VAR: &str = "TELESCOPE_BRANCH";
pub const REMOTE_ENV_VAR: &str = "TELESCOPE_REMOTE";

// Stash entries created by a run are labelled with this prefix
pub const STASH_MESSAGE_PREFIX: &str = "tele-scope: relocating changes from";

// Display formatting constants
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 200;
pub const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 197;

// UI Constants
pub const TERMINAL_TITLE_RUNNING: &str = "🚀 tele-scope";
pub const TERMINAL_TITLE_DONE: &str = "✅ tele-scope";
pub const COMPLETION_MESSAGE: &str = "Re-scope complete.";

/// Tracing filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "off";

/// Where the relocated commit is published
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteTarget {
    /// Push to (and optionally pull from) this remote
    Named(String),
    /// Do not push
    Disabled,
}

impl RemoteTarget {
    /// Parses a remote argument, recognising the sentinels that disable pushing
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == DISABLED_REMOTE_SENTINEL || value.eq_ignore_ascii_case(DISABLED_REMOTE_ALIAS) {
            RemoteTarget::Disabled
        } else {
            RemoteTarget::Named(value.to_string())
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RemoteTarget::Named(name) => Some(name),
            RemoteTarget::Disabled => None,
        }
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteTarget::Named(name) => f.write_str(name),
            RemoteTarget::Disabled => f.write_str("(push disabled)"),
        }
    }
}

/// Immutable settings for one relocation run
///
/// Built and validated once through [`RelocateConfigBuilder`] before the
/// repository is touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelocateConfig {
    /// Return to the local branch without rebasing
    pub no_rebase: bool,
    /// Keep the stash entry after a successful run
    pub no_clear: bool,
    /// Pull the upstream branch from the remote before committing
    pub pull: bool,
    /// Author name override
    pub user: Option<String>,
    /// Author email override
    pub email: Option<String>,
    /// Commit message; None lets git open the editor
    pub message: Option<String>,
    /// Branch that receives the changes
    pub upstream_branch: String,
    pub remote: RemoteTarget,
    /// Paths to relocate; empty relocates every change
    pub paths: Vec<String>,
}

impl RelocateConfig {
    pub fn builder() -> RelocateConfigBuilder {
        RelocateConfigBuilder::default()
    }

    /// Remote to push to, None when pushing is disabled
    pub fn push_remote(&self) -> Option<&str> {
        self.remote.name()
    }

    /// Whether only some paths are relocated, leaving the rest to be re-applied
    pub fn is_path_scoped(&self) -> bool {
        !self.paths.is_empty()
    }
}

impl Default for RelocateConfig {
    fn default() -> Self {
        Self {
            no_rebase: false,
            no_clear: false,
            pull: false,
            user: None,
            email: None,
            message: None,
            upstream_branch: DEFAULT_UPSTREAM_BRANCH.to_string(),
            remote: RemoteTarget::Named(DEFAULT_REMOTE.to_string()),
            paths: Vec::new(),
        }
    }
}

/// Builder for [`RelocateConfig`]
#[derive(Clone, Debug, Default)]
pub struct RelocateConfigBuilder {
    no_rebase: bool,
    no_clear: bool,
    pull: bool,
    user: Option<String>,
    email: Option<String>,
    message: Option<String>,
    upstream_branch: Option<String>,
    remote: Option<String>,
    paths: Vec<String>,
}

impl RelocateConfigBuilder {
    pub fn no_rebase(mut self, no_rebase: bool) -> Self {
        self.no_rebase = no_rebase;
        self
    }

    pub fn no_clear(mut self, no_clear: bool) -> Self {
        self.no_clear = no_clear;
        self
    }

    pub fn pull(mut self, pull: bool) -> Self {
        self.pull = pull;
        self
    }

    pub fn user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn upstream_branch(mut self, branch: impl Into<String>) -> Self {
        self.upstream_branch = Some(branch.into());
        self
    }

    /// Sets the remote; `"--"` or `"none"` disables pushing
    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the collected values
    pub fn build(self) -> Result<RelocateConfig> {
        let upstream_branch = self
            .upstream_branch
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BRANCH.to_string());
        let upstream_branch = upstream_branch.trim().to_string();
        if upstream_branch.is_empty() {
            anyhow::bail!("Upstream branch name cannot be empty");
        }
        if upstream_branch.starts_with('-') {
            anyhow::bail!("Invalid upstream branch name: {}", upstream_branch);
        }

        let remote = RemoteTarget::parse(self.remote.as_deref().unwrap_or(DEFAULT_REMOTE));
        if let RemoteTarget::Named(name) = &remote {
            if name.is_empty() {
                anyhow::bail!(
                    "Remote name cannot be empty (use \"{}\" to skip pushing)",
                    DISABLED_REMOTE_SENTINEL
                );
            }
        }
        if self.pull && remote == RemoteTarget::Disabled {
            anyhow::bail!("--pull needs a remote to pull from");
        }

        let identity = UserConfig::new(self.user, self.email);
        validate_user_config(&identity)?;

        if self.paths.iter().any(|path| path.trim().is_empty()) {
            anyhow::bail!("Path arguments cannot be empty");
        }

        Ok(RelocateConfig {
            no_rebase: self.no_rebase,
            no_clear: self.no_clear,
            pull: self.pull,
            user: identity.name.map(|name| name.trim().to_string()),
            email: identity.email.map(|email| email.trim().to_string()),
            message: self.message.filter(|message| !message.trim().is_empty()),
            upstream_branch,
            remote,
            paths: self.paths,
        })
    }
}
