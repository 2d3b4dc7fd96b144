//! Formatting of git error output for diagnostics

use crate::core::config::{ERROR_MESSAGE_MAX_LENGTH, ERROR_MESSAGE_TRUNCATE_LENGTH};

/// Cleans and formats git error output for display
///
/// Collapses whitespace, drops git's `error:` / `fatal:` / `hint:` noise and
/// shortens well-known remote failures to a short phrase.
pub fn clean_error_message(error: &str) -> String {
    let lines: Vec<&str> = error
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("hint:"))
        .map(|line| {
            line.strip_prefix("error: ")
                .or_else(|| line.strip_prefix("fatal: "))
                .unwrap_or(line)
        })
        .collect();
    let cleaned = lines.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");

    if is_auth_failure(&cleaned) {
        "authentication failed".to_string()
    } else if is_network_failure(&cleaned) {
        "network error".to_string()
    } else if cleaned.contains("Could not read from remote repository") {
        "could not read from remote repository".to_string()
    } else if cleaned.chars().count() > ERROR_MESSAGE_MAX_LENGTH {
        let truncated: String = cleaned.chars().take(ERROR_MESSAGE_TRUNCATE_LENGTH).collect();
        format!("{truncated}...")
    } else {
        cleaned
    }
}

// Only wording git and ssh use for remotes; local filesystem errors such as
// "unable to unlink ...: Permission denied" are kept as they are.
fn is_auth_failure(message: &str) -> bool {
    message.contains("Authentication failed")
        || message.contains("Permission denied (publickey")
        || message.contains("could not read Username")
}

fn is_network_failure(message: &str) -> bool {
    [
        "Could not resolve host",
        "Connection refused",
        "Connection timed out",
        "Connection reset",
        "Connection closed by remote host",
    ]
    .iter()
    .any(|pattern| message.contains(pattern))
}
