//! Relocate command implementation
//!
//! Runs the relocation workflow against the repository in the current
//! directory and prints its diagnostics.

use std::path::Path;

use crate::core::config::{
    RelocateConfig, COMPLETION_MESSAGE, TERMINAL_TITLE_DONE, TERMINAL_TITLE_RUNNING,
};
use crate::git::{GitCli, VcsBackend};
use crate::utils::{set_terminal_title, set_terminal_title_and_flush};
use crate::workflow::{relocate, Level, WorkflowOutcome};

/// Handles a relocation run in the current working directory
pub async fn handle_relocate_command(config: RelocateConfig) -> WorkflowOutcome {
    let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    handle_relocate_in(&cwd, &config).await
}

/// Handles a relocation run for the repository containing `path`
pub async fn handle_relocate_in(path: &Path, config: &RelocateConfig) -> WorkflowOutcome {
    set_terminal_title(TERMINAL_TITLE_RUNNING);

    println!("{}", describe_run(config));
    println!();

    let backend = GitCli::new(path);
    let outcome = run_with_backend(&backend, config).await;

    for line in render_outcome(&outcome) {
        if line.starts_with(Level::Error.symbol()) || line.starts_with(Level::Warning.symbol()) {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    set_terminal_title_and_flush(TERMINAL_TITLE_DONE);
    outcome
}

/// Runs the workflow against any backend
pub async fn run_with_backend(
    backend: &dyn VcsBackend,
    config: &RelocateConfig,
) -> WorkflowOutcome {
    relocate(backend, config).await
}

/// One-line summary of what the run will do
pub fn describe_run(config: &RelocateConfig) -> String {
    let what = if config.is_path_scoped() {
        let count = config.paths.len();
        let path_word = if count == 1 { "path" } else { "paths" };
        format!("{count} {path_word}")
    } else {
        "all changes".to_string()
    };

    match config.push_remote() {
        Some(remote) => format!(
            "🚀 Moving {what} onto {} and pushing to {remote}",
            config.upstream_branch
        ),
        None => format!("🚀 Moving {what} onto {} (no push)", config.upstream_branch),
    }
}

/// Formats the diagnostics and the final summary line
pub fn render_outcome(outcome: &WorkflowOutcome) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .diagnostics
        .iter()
        .map(|d| format!("{} {}", d.level.symbol(), d.message))
        .collect();

    lines.push(String::new());
    if outcome.is_success() {
        let suffix = if outcome.stash_retained {
            " (stash kept)"
        } else {
            ""
        };
        lines.push(format!("✅ {COMPLETION_MESSAGE}{suffix}"));
    } else {
        let step = outcome
            .failed_from
            .map(|state| state.next_step().to_string())
            .unwrap_or_else(|| "preconditions".to_string());
        lines.push(format!(
            "{} Stopped at {step} ({}, exit {})",
            outcome.status.symbol(),
            outcome.status.text(),
            outcome.exit_code()
        ));
    }

    lines
}
