//! States of the relocation state machine

use std::fmt;

/// Position of a relocation run in its linear sequence of steps
///
/// Runs move strictly forward from `Init` to `Done`. `Aborted` is absorbing
/// and reachable from every other state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    /// Preconditions checked, nothing mutated yet
    Init,
    /// Pending changes saved in a new stash entry
    Stashed,
    /// Upstream branch checked out and verified
    OnUpstream,
    /// Identity resolved, optional pull done, stash applied on upstream
    Applied,
    /// Changes staged and committed on upstream
    Committed,
    /// Commit published, or publishing skipped or failed non-fatally
    Pushed,
    /// Upstream tree cleaned and original branch checked out again
    BackOnLocal,
    /// Original branch rebased onto upstream, or rebase skipped
    Rebased,
    /// Remaining changes re-applied and stash handled
    Done,
    /// A step failed; the run stopped
    Aborted,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Aborted)
    }

    /// Name of the step that leaves this state
    pub fn next_step(&self) -> &'static str {
        match self {
            WorkflowState::Init => "stash",
            WorkflowState::Stashed => "checkout upstream",
            WorkflowState::OnUpstream => "apply stash",
            WorkflowState::Applied => "commit",
            WorkflowState::Committed => "push",
            WorkflowState::Pushed => "return to local branch",
            WorkflowState::BackOnLocal => "rebase",
            WorkflowState::Rebased => "restore stash",
            WorkflowState::Done | WorkflowState::Aborted => "none",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Init => "init",
            WorkflowState::Stashed => "stashed",
            WorkflowState::OnUpstream => "on-upstream",
            WorkflowState::Applied => "applied",
            WorkflowState::Committed => "committed",
            WorkflowState::Pushed => "pushed",
            WorkflowState::BackOnLocal => "back-on-local",
            WorkflowState::Rebased => "rebased",
            WorkflowState::Done => "done",
            WorkflowState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
