//! Result of a relocation run

use super::state::WorkflowState;
use super::status::ExitStatus;

/// Severity of a diagnostic line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// Returns the emoji symbol for this level
    pub fn symbol(&self) -> &str {
        match self {
            Level::Info => "🟢",
            Level::Warning => "🟡",
            Level::Error => "🔴",
        }
    }
}

/// A human-readable message produced during a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Terminal result of a relocation run
#[derive(Clone, Debug)]
pub struct WorkflowOutcome {
    pub status: ExitStatus,
    /// Last state reached; `Aborted` when a step failed
    pub state: WorkflowState,
    /// State the run was in when it aborted, None when preconditions failed
    pub failed_from: Option<WorkflowState>,
    /// Whether the stash entry created by this run still exists
    pub stash_retained: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl WorkflowOutcome {
    pub fn exit_code(&self) -> u8 {
        self.status.code()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level == Level::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level == Level::Error)
    }

    /// Whether any diagnostic contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.diagnostics.iter().any(|d| d.message.contains(needle))
    }
}
