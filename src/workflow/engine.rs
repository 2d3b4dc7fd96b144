//! Relocation workflow engine
//!
//! Moves the pending changes of the current branch onto the upstream branch:
//! 1. Stash the changes and check out upstream
//! 2. Apply, commit and push them there
//! 3. Return to the local branch, rebase it, and restore what was left behind
//!
//! Each step is one transition of [`WorkflowState`]. A failing step aborts the
//! run and never touches the stash entry created in step 1, so the operator
//! can always recover with `git stash apply`.

use crate::core::config::{RelocateConfig, STASH_MESSAGE_PREFIX};
use crate::git::{UserConfig, VcsBackend};

use super::author::AuthorDescriptor;
use super::outcome::{Diagnostic, WorkflowOutcome};
use super::state::WorkflowState;
use super::status::ExitStatus;

const STASH_KEPT_MESSAGE: &str =
    "Your changes are still in the stash; restore them with `git stash apply` (see `git stash list`)";
const NOTHING_CHANGED_MESSAGE: &str = "Nothing was changed in the repository";

/// Why a step stopped the run
#[derive(Debug)]
struct Abort {
    status: ExitStatus,
    message: String,
}

impl Abort {
    fn new(status: ExitStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

type StepResult = Result<WorkflowState, Abort>;

/// One relocation run against a backend
pub struct RelocationWorkflow<'a> {
    backend: &'a dyn VcsBackend,
    config: &'a RelocateConfig,
    state: WorkflowState,
    original_branch: String,
    author: Option<AuthorDescriptor>,
    stash_created: bool,
    stash_dropped: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RelocationWorkflow<'a> {
    pub fn new(backend: &'a dyn VcsBackend, config: &'a RelocateConfig) -> Self {
        Self {
            backend,
            config,
            state: WorkflowState::Init,
            original_branch: String::new(),
            author: None,
            stash_created: false,
            stash_dropped: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Runs every step in order and reports how far it got
    ///
    /// Never panics on backend failures and never exits the process; the
    /// caller maps the returned status to an exit code.
    pub async fn run(mut self) -> WorkflowOutcome {
        if let Err(abort) = self.check_preconditions().await {
            return self.abort(abort, None);
        }

        while !self.state.is_terminal() {
            match self.step().await {
                Ok(next) => {
                    tracing::debug!(from = %self.state, to = %next, "transition");
                    self.state = next;
                }
                Err(abort) => {
                    let failed_from = Some(self.state);
                    return self.abort(abort, failed_from);
                }
            }
        }

        self.finish()
    }

    async fn step(&mut self) -> StepResult {
        match self.state {
            WorkflowState::Init => self.stash_changes().await,
            WorkflowState::Stashed => self.checkout_upstream().await,
            WorkflowState::OnUpstream => self.apply_on_upstream().await,
            WorkflowState::Applied => self.commit_changes().await,
            WorkflowState::Committed => self.push_changes().await,
            WorkflowState::Pushed => self.return_to_local().await,
            WorkflowState::BackOnLocal => self.rebase_local().await,
            WorkflowState::Rebased => self.restore_and_clear().await,
            WorkflowState::Done | WorkflowState::Aborted => Ok(self.state),
        }
    }

    /// Read-only checks; nothing may be mutated before they pass
    async fn check_preconditions(&mut self) -> Result<(), Abort> {
        let config = self.config;

        if !self.backend.is_inside_work_tree().await {
            return Err(Abort::new(
                ExitStatus::BranchError,
                "You must be inside a git repository to run tele-scope",
            ));
        }

        let branch = self.backend.current_branch().await.ok_or_else(|| {
            Abort::new(
                ExitStatus::BranchError,
                "Could not determine the current branch (detached HEAD?)",
            )
        })?;
        if branch == config.upstream_branch {
            return Err(Abort::new(
                ExitStatus::BranchError,
                format!(
                    "Already on upstream branch '{branch}'; run tele-scope from the branch holding your changes"
                ),
            ));
        }
        self.original_branch = branch;

        match self.backend.is_tree_dirty().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(Abort::new(ExitStatus::StashError, "No local changes to save"));
            }
            Err(e) => {
                return Err(Abort::new(
                    ExitStatus::StashError,
                    format!("Could not inspect the working tree: {e:#}"),
                ));
            }
        }

        if let Some(remote) = config.push_remote() {
            match self.backend.has_remote(remote).await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(Abort::new(
                        ExitStatus::RemoteError,
                        format!(
                            "No remote '{remote}' found. To run without pushing, use \"-r --\""
                        ),
                    ));
                }
                Err(e) => {
                    return Err(Abort::new(
                        ExitStatus::RemoteError,
                        format!("Could not list remotes: {e:#}"),
                    ));
                }
            }
        }

        Ok(())
    }

    // Step 1
    async fn stash_changes(&mut self) -> StepResult {
        tracing::info!(branch = %self.original_branch, "stashing pending changes");

        let message = format!("{STASH_MESSAGE_PREFIX} {}", self.original_branch);
        self.backend.stash(&message).await.map_err(|e| {
            Abort::new(ExitStatus::StashError, format!("Could not stash changes: {e:#}"))
        })?;

        self.stash_created = true;
        self.note(format!("Stashed pending changes on {}", self.original_branch));
        Ok(WorkflowState::Stashed)
    }

    // Step 2
    async fn checkout_upstream(&mut self) -> StepResult {
        let config = self.config;
        let upstream = &config.upstream_branch;
        tracing::info!(%upstream, "checking out upstream branch");

        let failure = match self.backend.checkout(upstream).await {
            Ok(()) => match self.backend.current_branch().await {
                Some(branch) if branch == *upstream => None,
                Some(branch) => Some(format!(
                    "Expected to be on '{upstream}' after checkout, but '{branch}' is checked out"
                )),
                None => Some(format!(
                    "Expected to be on '{upstream}' after checkout, but HEAD is detached"
                )),
            },
            Err(e) => Some(format!("Could not check out '{upstream}': {e:#}")),
        };

        if let Some(message) = failure {
            // The stash is not re-applied: the checked-out branch is unknown.
            if let Err(e) = self.backend.checkout(&self.original_branch).await {
                tracing::warn!(
                    branch = %self.original_branch,
                    error = %e,
                    "could not return to original branch"
                );
            }
            return Err(Abort::new(ExitStatus::BranchError, message));
        }

        Ok(WorkflowState::OnUpstream)
    }

    // Steps 3 to 5
    async fn apply_on_upstream(&mut self) -> StepResult {
        let config = self.config;

        let author = self.resolve_author().await;
        tracing::info!(%author, "resolved commit author");
        self.author = Some(author);

        if config.pull {
            if let Some(remote) = config.push_remote() {
                tracing::info!(
                    %remote,
                    branch = %config.upstream_branch,
                    "pulling upstream branch"
                );
                self.backend
                    .pull(remote, &config.upstream_branch)
                    .await
                    .map_err(|e| {
                        Abort::new(
                            ExitStatus::RemoteError,
                            format!("Problem with pull from {remote}: {e:#}"),
                        )
                    })?;
                self.note(format!("Pulled {} from {remote}", config.upstream_branch));
            }
        }

        self.backend.stash_apply().await.map_err(|e| {
            Abort::new(
                ExitStatus::StashError,
                format!(
                    "Could not apply the stash on '{}': {e:#}",
                    config.upstream_branch
                ),
            )
        })?;

        Ok(WorkflowState::Applied)
    }

    /// Explicit values win, then the upstream branch's identity, then the local one
    async fn resolve_author(&mut self) -> AuthorDescriptor {
        let config = self.config;

        let backend = self.backend;

        let mut identity = UserConfig::new(config.user.clone(), config.email.clone());
        if !identity.is_complete() {
            let upstream = backend.configured_identity(&config.upstream_branch).await;
            identity = identity.or(upstream);
        }
        if !identity.is_complete() {
            let local = backend.configured_identity(&self.original_branch).await;
            identity = identity.or(local);
        }

        let (author, warnings) = AuthorDescriptor::resolve(&identity);
        for warning in warnings {
            self.warn(warning);
        }
        author
    }

    // Steps 6 and 7
    async fn commit_changes(&mut self) -> StepResult {
        let config = self.config;
        let upstream = &config.upstream_branch;

        self.backend.add(&config.paths).await.map_err(|e| {
            Abort::new(ExitStatus::CommitError, format!("Could not stage changes: {e:#}"))
        })?;

        let author_arg = self.author.as_ref().and_then(AuthorDescriptor::to_author_arg);
        tracing::info!(%upstream, author = ?author_arg, "committing");
        self.backend
            .commit(author_arg.as_deref(), config.message.as_deref())
            .await
            .map_err(|e| {
                Abort::new(
                    ExitStatus::CommitError,
                    format!("Commit on '{upstream}' failed: {e:#}"),
                )
            })?;

        self.note(format!("Committed changes to {upstream}"));
        Ok(WorkflowState::Committed)
    }

    // Step 8; a failed push is reported but does not stop the run
    async fn push_changes(&mut self) -> StepResult {
        let config = self.config;
        let upstream = &config.upstream_branch;

        match config.push_remote() {
            None => {
                self.note(format!("Pushing disabled; the commit stays local on {upstream}"));
            }
            Some(remote) => {
                tracing::info!(%remote, %upstream, "pushing");
                match self.backend.push(remote, upstream).await {
                    Ok(()) => self.note(format!("Pushed {upstream} to {remote}")),
                    Err(e) => self.warn(format!(
                        "Push of {upstream} to {remote} failed: {e:#}. The commit is local only; publish it with `git push {remote} {upstream}`"
                    )),
                }
            }
        }

        Ok(WorkflowState::Pushed)
    }

    // Steps 9 and 10
    async fn return_to_local(&mut self) -> StepResult {
        let config = self.config;
        let upstream = &config.upstream_branch;

        self.backend.reset_and_restore().await.map_err(|e| {
            Abort::new(
                ExitStatus::StashError,
                format!("Could not clean the working tree on '{upstream}': {e:#}"),
            )
        })?;

        tracing::info!(branch = %self.original_branch, "returning to original branch");
        self.backend
            .checkout(&self.original_branch)
            .await
            .map_err(|e| {
                Abort::new(
                    ExitStatus::BranchError,
                    format!("Could not check out '{}': {e:#}", self.original_branch),
                )
            })?;

        match self.backend.current_branch().await {
            Some(branch) if branch == self.original_branch => Ok(WorkflowState::BackOnLocal),
            other => Err(Abort::new(
                ExitStatus::BranchError,
                format!(
                    "Expected to be back on '{}', but {} is checked out",
                    self.original_branch,
                    other.map_or_else(|| "a detached HEAD".to_string(), |b| format!("'{b}'"))
                ),
            )),
        }
    }

    // Step 11
    async fn rebase_local(&mut self) -> StepResult {
        let config = self.config;
        let upstream = &config.upstream_branch;

        if config.no_rebase {
            self.note("--norebase option set, skipping rebase");
            return Ok(WorkflowState::Rebased);
        }

        tracing::info!(branch = %self.original_branch, %upstream, "rebasing");
        self.backend.rebase(upstream).await.map_err(|e| {
            Abort::new(
                ExitStatus::ConflictsError,
                format!(
                    "Problem in rebase of '{}' onto '{upstream}': {e:#}. Resolve the conflicts and run `git rebase --continue`, or `git rebase --abort`",
                    self.original_branch
                ),
            )
        })?;

        self.note(format!("Rebased {} onto {upstream}", self.original_branch));
        Ok(WorkflowState::Rebased)
    }

    // Steps 12 and 13; the only place the stash may be dropped
    async fn restore_and_clear(&mut self) -> StepResult {
        if self.config.is_path_scoped() {
            self.backend.stash_apply().await.map_err(|e| {
                Abort::new(
                    ExitStatus::StashError,
                    format!(
                        "Could not re-apply the remaining changes on '{}': {e:#}",
                        self.original_branch
                    ),
                )
            })?;
            self.note(format!("Re-applied remaining changes on {}", self.original_branch));
        }

        if self.config.no_clear {
            self.note("--noclear option set, keeping stash");
            return Ok(WorkflowState::Done);
        }

        match self.backend.stash_drop().await {
            Ok(()) => {
                self.stash_dropped = true;
                self.note("Dropped the stash");
            }
            Err(e) => self.warn(format!(
                "Could not drop the stash: {e:#}. Remove it with `git stash drop` once you have checked it"
            )),
        }

        Ok(WorkflowState::Done)
    }

    fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.diagnostics.push(Diagnostic::info(message));
    }

    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.diagnostics.push(Diagnostic::warning(message));
    }

    /// `failed_from` is None when the preconditions failed
    fn abort(mut self, abort: Abort, failed_from: Option<WorkflowState>) -> WorkflowOutcome {
        tracing::error!(
            status = abort.status.text(),
            step = failed_from.map_or("preconditions", |state| state.next_step()),
            "{}",
            abort.message
        );
        self.diagnostics.push(Diagnostic::error(abort.message));

        if self.stash_created {
            self.diagnostics.push(Diagnostic::warning(STASH_KEPT_MESSAGE));
        } else {
            self.diagnostics.push(Diagnostic::info(NOTHING_CHANGED_MESSAGE));
        }

        WorkflowOutcome {
            status: abort.status,
            state: WorkflowState::Aborted,
            failed_from,
            stash_retained: self.stash_created,
            diagnostics: self.diagnostics,
        }
    }

    fn finish(self) -> WorkflowOutcome {
        WorkflowOutcome {
            status: ExitStatus::Success,
            state: WorkflowState::Done,
            failed_from: None,
            stash_retained: self.stash_created && !self.stash_dropped,
            diagnostics: self.diagnostics,
        }
    }
}

/// Runs a complete relocation against `backend`
pub async fn relocate(backend: &dyn VcsBackend, config: &RelocateConfig) -> WorkflowOutcome {
    RelocationWorkflow::new(backend, config).run().await
}
