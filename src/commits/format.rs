//! Commit message formatting helpers

/// First line of a commit message, trimmed
pub fn first_message_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// Short (7 character) form of a commit sha
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Display message for a commit
///
/// Appends the pull request number when known, unless the first line
/// already contains it. Commits without a pull request get the short sha
/// instead.
pub fn formatted_commit_message(message: &str, pull_number: Option<u64>, sha: &str) -> String {
    let first_line = first_message_line(message);
    match pull_number {
        Some(number) => {
            let tag = format!("#{number}");
            if first_line.contains(&tag) {
                first_line.to_string()
            } else {
                format!("{first_line} ({tag})")
            }
        }
        None => format!("{first_line} ({})", short_sha(sha)),
    }
}
