//! Command line interface definition
//!
//! Parses the flags into a validated [`RelocateConfig`]. Help, version and
//! argument errors are mapped to their [`ExitStatus`] here so the repository
//! is never touched for them.

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;

use crate::core::config::{
    RelocateConfig, BRANCH_ENV_VAR, DEFAULT_REMOTE, DEFAULT_UPSTREAM_BRANCH, REMOTE_ENV_VAR,
};
use crate::workflow::ExitStatus;

const ABOUT: &str = "Move files from the current (local) changeset to an upstream branch:
  1) stashes the changeset and moves upstream to apply it
  2) commits the changeset and pushes it to the remote
  3) returns to the local branch and rebases onto the upstream branch";

const CAVEATS: &str = "Caveats:
  - If your current branch is part of a public repository, think carefully
    about whether you want to rebase it.
  - tele-scope does NOT merge after rebasing. The idea is that the current
    branch holds committed work you don't want on the upstream branch yet.
  - If a step fails, tele-scope stops. The stash is only dropped once the
    changes are committed and the local branch has been restored and rebased.";

#[derive(Parser, Debug)]
#[command(name = "tele-scope")]
#[command(version, about = ABOUT, after_help = CAVEATS)]
#[command(override_usage = "tele-scope [OPTIONS] [FILES]...")]
pub struct Cli {
    /// Return to the local branch, but do not rebase
    #[arg(short = 'b', long = "norebase")]
    pub no_rebase: bool,

    /// Keep the stashed changes instead of dropping them after rebasing
    #[arg(short = 'c', long = "noclear")]
    pub no_clear: bool,

    /// Use this address as the commit author's email
    #[arg(short = 'e', long)]
    pub email: Option<String>,

    /// Commit message (opens the editor when omitted)
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Upstream branch that receives the changes
    #[arg(
        short = 'n',
        long = "branch",
        default_value = DEFAULT_UPSTREAM_BRANCH,
        env = BRANCH_ENV_VAR
    )]
    pub branch: String,

    /// Pull from the remote before committing
    #[arg(short = 'p', long)]
    pub pull: bool,

    /// Remote to push to; "--" skips pushing
    #[arg(
        short = 'r',
        long,
        default_value = DEFAULT_REMOTE,
        env = REMOTE_ENV_VAR,
        allow_hyphen_values = true
    )]
    pub remote: String,

    /// Use this name as the commit author
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Files or directories to move; all changes when omitted.
    /// Changes outside them are re-applied after rebasing.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

impl Cli {
    /// Validates the parsed flags into a configuration value
    pub fn into_config(self) -> anyhow::Result<RelocateConfig> {
        RelocateConfig::builder()
            .no_rebase(self.no_rebase)
            .no_clear(self.no_clear)
            .pull(self.pull)
            .user(self.user)
            .email(self.email)
            .message(self.message)
            .upstream_branch(self.branch)
            .remote(self.remote)
            .paths(self.files)
            .build()
    }
}

/// Maps a clap parse failure onto the exit status it stands for
pub fn exit_status_for(error: &clap::Error) -> ExitStatus {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            ExitStatus::HelpRequested
        }
        ErrorKind::DisplayVersion => ExitStatus::Success,
        _ => ExitStatus::ArgumentError,
    }
}

/// Parses command line arguments into a configuration
///
/// Prints usage or the validation error and returns the matching status when
/// no relocation should run.
pub fn parse_args<I, T>(args: I) -> Result<RelocateConfig, ExitStatus>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Err(exit_status_for(&e));
        }
    };

    cli.into_config().map_err(|e| {
        eprintln!("🔴 {e}");
        ExitStatus::ArgumentError
    })
}
