//! Public API for the core module.
//!
//! This module provides the stable public API for configuration:
//! - The relocation configuration value and its builder
//! - Defaults and sentinels shared by the CLI and the workflow

pub use super::config::{RelocateConfig, RelocateConfigBuilder, RemoteTarget};

pub use super::config::{
    BRANCH_ENV_VAR, DEFAULT_REMOTE, DEFAULT_UPSTREAM_BRANCH, DISABLED_REMOTE_SENTINEL,
    REMOTE_ENV_VAR, STASH_MESSAGE_PREFIX,
};

// User-facing messages
pub use super::config::{COMPLETION_MESSAGE, TERMINAL_TITLE_DONE, TERMINAL_TITLE_RUNNING};
