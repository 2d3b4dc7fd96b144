//! Exit status enumeration and utilities

use std::process::ExitCode;

/// Terminal status of a relocation run
///
/// Each variant is a distinct exit condition of the `tele-scope` binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Changes were relocated and the local branch restored
    Success,
    /// A branch could not be checked out, verified or determined
    BranchError,
    /// Stashing, applying or cleaning up changes failed (includes "no changes")
    StashError,
    /// Staging or committing on the upstream branch failed
    CommitError,
    /// The remote is missing or the pull failed
    RemoteError,
    /// The rebase onto the upstream branch stopped
    ConflictsError,
    /// Usage text was requested
    HelpRequested,
    /// Command line arguments were invalid
    ArgumentError,
}

impl ExitStatus {
    /// Returns the process exit code for this status
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::BranchError => 1,
            ExitStatus::StashError => 2,
            ExitStatus::CommitError => 3,
            ExitStatus::RemoteError => 4,
            ExitStatus::ConflictsError => 5,
            ExitStatus::HelpRequested => 126,
            ExitStatus::ArgumentError => 127,
        }
    }

    /// Returns the emoji symbol for this status
    pub fn symbol(&self) -> &str {
        match self {
            ExitStatus::Success => "🟢",
            ExitStatus::HelpRequested => "🟠",
            ExitStatus::ArgumentError => "🟡",
            ExitStatus::BranchError
            | ExitStatus::StashError
            | ExitStatus::CommitError
            | ExitStatus::RemoteError
            | ExitStatus::ConflictsError => "🔴",
        }
    }

    /// Returns the text representation of this status
    pub fn text(&self) -> &str {
        match self {
            ExitStatus::Success => "success",
            ExitStatus::BranchError => "branch-error",
            ExitStatus::StashError => "stash-error",
            ExitStatus::CommitError => "commit-error",
            ExitStatus::RemoteError => "remote-error",
            ExitStatus::ConflictsError => "conflicts",
            ExitStatus::HelpRequested => "help",
            ExitStatus::ArgumentError => "argument-error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
