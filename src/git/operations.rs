//! Basic git operations and command execution
//!
//! Every wrapper here runs one git primitive in the repository directory and
//! turns a non-zero exit into an error carrying git's condensed stderr.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;

use crate::utils::clean_error_message;

// Git command arguments
const GIT_IS_INSIDE_WORK_TREE_ARGS: &[&str] = &["rev-parse", "--is-inside-work-tree"];
const GIT_SYMBOLIC_REF_HEAD_ARGS: &[&str] = &["symbolic-ref", "--quiet", "--short", "HEAD"];
const GIT_STATUS_TRACKED_ARGS: &[&str] = &["status", "--porcelain", "--untracked-files=no"];
const GIT_REMOTE_ARGS: &[&str] = &["remote"];
const GIT_CONFIG_GET_ARGS: &[&str] = &["config", "--get"];
const GIT_STASH_PUSH_ARGS: &[&str] = &["stash", "push", "-m"];
const GIT_STASH_APPLY_ARGS: &[&str] = &["stash", "apply"];
const GIT_STASH_DROP_ARGS: &[&str] = &["stash", "drop"];
const GIT_ADD_ALL_ARGS: &[&str] = &["add", "-A"];
const GIT_ADD_PATHS_ARGS: &[&str] = &["add", "--"];
const GIT_RESET_ARGS: &[&str] = &["reset", "-q"];
const GIT_FORCE_CHECKOUT_ARGS: &[&str] = &["checkout", "-f"];
const GIT_SHOW_TOPLEVEL_ARGS: &[&str] = &["rev-parse", "--show-toplevel"];
const GIT_STASH_ADDED_FILES_ARGS: &[&str] =
    &["diff", "--name-only", "--diff-filter=A", "stash@{0}^1", "stash@{0}"];

/// Runs a git command in the specified directory
/// Returns (success, stdout, stderr)
pub async fn run_git(path: &Path, args: &[&str]) -> Result<(bool, String, String)> {
    tracing::debug!(?args, dir = %path.display(), "running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .await
        .context("Failed to run git")?;

    Ok((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
        String::from_utf8_lossy(&output.stderr).trim().to_string(),
    ))
}

/// Runs a git command with the terminal attached, so git can open an editor
/// Returns whether the command succeeded
pub async fn run_git_interactive(path: &Path, args: &[&str]) -> Result<bool> {
    tracing::debug!(?args, dir = %path.display(), "running git interactively");

    let status = Command::new("git")
        .args(args)
        .current_dir(path)
        .status()
        .await
        .context("Failed to run git")?;

    Ok(status.success())
}

/// Runs a git command and fails unless it exits successfully
async fn run_git_checked(path: &Path, args: &[&str], what: &str) -> Result<String> {
    let (success, stdout, stderr) = run_git(path, args).await?;
    if success {
        return Ok(stdout);
    }

    let detail = if stderr.is_empty() { stdout } else { stderr };
    if detail.is_empty() {
        anyhow::bail!("{what} failed");
    }
    anyhow::bail!("{what} failed: {}", clean_error_message(&detail))
}

/// Reads a git config value from the specified repository
/// Returns the config value if it exists, None if not found
pub(crate) async fn get_git_config(path: &Path, key: &str) -> Result<Option<String>> {
    let mut args = Vec::from(GIT_CONFIG_GET_ARGS);
    args.push(key);

    match run_git(path, &args).await {
        Ok((true, value, _)) => {
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value))
            }
        }
        Ok((false, _, _)) => Ok(None), // Key not found
        Err(e) => Err(e),
    }
}

/// Checks whether the directory is inside a git working tree
pub async fn is_inside_work_tree(path: &Path) -> bool {
    matches!(
        run_git(path, GIT_IS_INSIDE_WORK_TREE_ARGS).await,
        Ok((true, output, _)) if output == "true"
    )
}

/// Gets the name of the checked-out branch
/// Returns None on a detached HEAD or outside a repository
pub async fn get_current_branch(path: &Path) -> Option<String> {
    match run_git(path, GIT_SYMBOLIC_REF_HEAD_ARGS).await {
        Ok((true, branch, _)) if !branch.is_empty() => Some(branch),
        _ => None,
    }
}

/// Checks if tracked files have staged or unstaged changes
///
/// Untracked files are ignored: a plain `git stash` leaves them in place, so
/// they cannot be relocated.
pub async fn has_pending_changes(path: &Path) -> Result<bool> {
    let stdout = run_git_checked(path, GIT_STATUS_TRACKED_ARGS, "git status").await?;
    Ok(!stdout.is_empty())
}

/// Checks if a remote with the given name is configured
pub async fn remote_exists(path: &Path, remote: &str) -> Result<bool> {
    let stdout = run_git_checked(path, GIT_REMOTE_ARGS, "git remote").await?;
    Ok(stdout.lines().any(|line| line.trim() == remote))
}

/// Stashes tracked changes under the given message
pub async fn stash_push(path: &Path, message: &str) -> Result<()> {
    let mut args = Vec::from(GIT_STASH_PUSH_ARGS);
    args.push(message);

    let (success, stdout, stderr) = run_git(path, &args).await?;
    // Older gits exit 0 when there is nothing to stash
    if stdout.contains("No local changes to save") {
        anyhow::bail!("No local changes to save");
    }
    if !success {
        anyhow::bail!("git stash failed: {}", clean_error_message(&stderr));
    }
    Ok(())
}

/// Applies the most recent stash entry without removing it
pub async fn stash_apply(path: &Path) -> Result<()> {
    run_git_checked(path, GIT_STASH_APPLY_ARGS, "git stash apply").await?;
    Ok(())
}

/// Drops the most recent stash entry
pub async fn stash_drop(path: &Path) -> Result<()> {
    run_git_checked(path, GIT_STASH_DROP_ARGS, "git stash drop").await?;
    Ok(())
}

/// Checks out an existing branch
pub async fn checkout_branch(path: &Path, branch: &str) -> Result<()> {
    run_git_checked(path, &["checkout", branch, "--"], "git checkout").await?;
    Ok(())
}

/// Pulls a branch from a remote into the checked-out branch
pub async fn pull_branch(path: &Path, remote: &str, branch: &str) -> Result<()> {
    run_git_checked(path, &["pull", remote, branch], "git pull").await?;
    Ok(())
}

/// Stages the given paths, or every change in the tree when `paths` is empty
pub async fn stage_paths(path: &Path, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        run_git_checked(path, GIT_ADD_ALL_ARGS, "git add").await?;
        return Ok(());
    }

    // `stash apply` stages files the stash added; only the named paths may be committed
    run_git_checked(path, GIT_RESET_ARGS, "git reset").await?;

    let mut args = Vec::from(GIT_ADD_PATHS_ARGS);
    args.extend(paths.iter().map(String::as_str));
    run_git_checked(path, &args, "git add").await?;
    Ok(())
}

/// Commits staged changes
///
/// Without a message git opens the configured editor, so the terminal stays
/// attached and an aborted edit surfaces as a failure.
pub async fn commit_changes(
    path: &Path,
    author: Option<&str>,
    message: Option<&str>,
) -> Result<()> {
    let author_arg = author.map(|author| format!("--author={author}"));

    let mut args = vec!["commit"];
    if let Some(author_arg) = &author_arg {
        args.push(author_arg.as_str());
    }

    match message {
        Some(message) => {
            args.push("-m");
            args.push(message);
            run_git_checked(path, &args, "git commit").await?;
        }
        None => {
            if !run_git_interactive(path, &args).await? {
                anyhow::bail!("git commit failed or was aborted");
            }
        }
    }
    Ok(())
}

/// Pushes a branch to a remote
pub async fn push_branch(path: &Path, remote: &str, branch: &str) -> Result<()> {
    run_git_checked(path, &["push", remote, branch], "git push").await?;
    Ok(())
}

/// Unstages everything and discards changes to tracked files
///
/// Files added by the latest stash entry that were not committed are removed
/// as well: they are still in the stash, and leaving them behind untracked
/// would block applying it again.
pub async fn reset_and_restore(path: &Path) -> Result<()> {
    let toplevel = run_git_checked(path, GIT_SHOW_TOPLEVEL_ARGS, "git rev-parse").await?;
    let toplevel = Path::new(&toplevel);
    let stashed_new = run_git_checked(toplevel, GIT_STASH_ADDED_FILES_ARGS, "git diff").await?;

    run_git_checked(path, GIT_RESET_ARGS, "git reset").await?;
    run_git_checked(path, GIT_FORCE_CHECKOUT_ARGS, "git checkout -f").await?;

    for file in stashed_new.lines().filter(|line| !line.is_empty()) {
        let tracked = run_git_checked(toplevel, &["ls-files", "--", file], "git ls-files").await?;
        if !tracked.is_empty() {
            continue;
        }

        tracing::debug!(%file, "removing uncommitted file added by the stash");
        match tokio::fs::remove_file(toplevel.join(file)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to remove {file}"));
            }
        }
    }
    Ok(())
}

/// Rebases the checked-out branch onto another branch
pub async fn rebase_onto(path: &Path, onto: &str) -> Result<()> {
    run_git_checked(path, &["rebase", onto], "git rebase").await?;
    Ok(())
}
