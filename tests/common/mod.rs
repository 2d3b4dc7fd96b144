//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod git;
pub mod mock_backend;

pub use self::fixtures::{TestRepo, TestRepoBuilder};
pub use self::git::{git, is_git_available, setup_git_repo};
pub use self::mock_backend::{Call, MockBackend, Op};
