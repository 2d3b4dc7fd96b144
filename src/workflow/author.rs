//! Author attribution for the relocated commit

use std::fmt;

use crate::git::UserConfig;

pub const MISSING_EMAIL_WARNING: &str = "No user email configured; committing without an email";
pub const MISSING_NAME_WARNING: &str = "No user name configured; committing without a name";

/// Resolved `--author` value for the relocated commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorDescriptor {
    /// Rendered as `name <email>`
    Full { name: String, email: String },
    NameOnly(String),
    EmailOnly(String),
    /// Leave attribution to git's own configuration
    Absent,
}

impl AuthorDescriptor {
    /// Builds the descriptor from a resolved identity
    ///
    /// Returns the warnings to report alongside it, one for each missing part.
    pub fn resolve(identity: &UserConfig) -> (Self, Vec<String>) {
        match (identity.name.clone(), identity.email.clone()) {
            (Some(name), Some(email)) => (AuthorDescriptor::Full { name, email }, Vec::new()),
            (Some(name), None) => (
                AuthorDescriptor::NameOnly(name),
                vec![MISSING_EMAIL_WARNING.to_string()],
            ),
            (None, Some(email)) => (
                AuthorDescriptor::EmailOnly(email),
                vec![MISSING_NAME_WARNING.to_string()],
            ),
            (None, None) => (
                AuthorDescriptor::Absent,
                vec![
                    MISSING_NAME_WARNING.to_string(),
                    MISSING_EMAIL_WARNING.to_string(),
                ],
            ),
        }
    }

    /// Value for `git commit --author`, None when no override applies
    pub fn to_author_arg(&self) -> Option<String> {
        match self {
            AuthorDescriptor::Absent => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for AuthorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorDescriptor::Full { name, email } => write!(f, "{name} <{email}>"),
            AuthorDescriptor::NameOnly(name) => f.write_str(name),
            AuthorDescriptor::EmailOnly(email) => f.write_str(email),
            AuthorDescriptor::Absent => f.write_str("(git default)"),
        }
    }
}
