use std::io;

use thiserror::Error;

/// Failures of the reference/patch pipeline.
#[derive(Debug, Error)]
pub enum VdiffError {
    /// Input doesn't look like a commit hash or a stash slot.
    #[error("{0} doesn't appear to be a valid commit or stash")]
    InvalidReference(String),

    /// The external tool ran but exited unsuccessfully.
    #[error("`{command}` failed ({}): {}", exit_label(.code), trimmed(.stderr))]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("empty command")]
    EmptyCommand,

    #[error("could not parse command: {0}")]
    CommandSyntax(#[from] shell_words::ParseError),

    #[error("failed to read references from stdin: {0}")]
    Stdin(#[source] io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {code}"),
        None => "killed by signal".to_string(),
    }
}

fn trimmed(stderr: &str) -> &str {
    stderr.trim_end()
}
