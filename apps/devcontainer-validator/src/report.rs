//! Outcome reporting through workflow commands
//! https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions

/// Print a plain message to the job log
pub fn info(message: &str) {
    println!("{}", message);
}

/// Mark the step as failed with an error annotation
///
/// The process still has to exit with a non-zero status.
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}

fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Escape a command's data so it stays on a single line
fn escape_data(data: &str) -> String {
    data.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
