//! Git user configuration lookup

use anyhow::Result;
use std::path::Path;

use super::operations::get_git_config;

/// Represents user configuration (name and email) used to attribute commits
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserConfig {
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self { name, email }
    }

    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some()
    }

    /// Fills missing fields from `other`, keeping the values already set
    pub fn or(self, other: UserConfig) -> UserConfig {
        UserConfig {
            name: self.name.or(other.name),
            email: self.email.or(other.email),
        }
    }
}

/// Gets the user config that applies to commits made on `branch`
///
/// Git has no per-branch identity, so `branch.<name>.username` and
/// `branch.<name>.useremail` are consulted first and the repository's
/// effective `user.name` / `user.email` fill whatever they leave unset.
pub async fn get_branch_user_config(path: &Path, branch: &str) -> UserConfig {
    let branch_name = get_git_config(path, &format!("branch.{branch}.username"))
        .await
        .unwrap_or(None);
    let branch_email = get_git_config(path, &format!("branch.{branch}.useremail"))
        .await
        .unwrap_or(None);

    UserConfig::new(branch_name, branch_email).or(get_current_user_config(path).await)
}

/// Gets the current user config (name and email) from a repository
pub async fn get_current_user_config(path: &Path) -> UserConfig {
    let name = get_git_config(path, "user.name").await.unwrap_or(None);
    let email = get_git_config(path, "user.email").await.unwrap_or(None);
    UserConfig::new(name, email)
}

/// Validates user config values according to basic requirements
pub fn validate_user_config(config: &UserConfig) -> Result<()> {
    if let Some(name) = &config.name {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("User name cannot be empty"));
        }
    }

    if let Some(email) = &config.email {
        if email.trim().is_empty() {
            return Err(anyhow::anyhow!("User email cannot be empty"));
        }
    }

    Ok(())
}
