use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vdiff",
    version,
    about = "Browse the patches of git commits and stashes in the terminal"
)]
pub struct Cli {
    /// Commits or stashes to browse (`-` reads more from stdin).
    /// Defaults to the output of `git log`.
    #[arg(short = 'c', long = "commits", num_args = 1..)]
    pub commits: Vec<String>,

    /// Colour theme (one-dark, dracula, tokyo-night)
    #[arg(long)]
    pub theme: Option<String>,

    /// Write logs here instead of the default state directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args() {
        let cli = Cli::try_parse_from(["vdiff"]).unwrap();
        assert!(cli.commits.is_empty());
        assert!(cli.theme.is_none());
    }

    #[test]
    fn test_commits_with_stdin_marker() {
        let cli = Cli::try_parse_from(["vdiff", "-c", "abc1234", "-", "stash@{0}"]).unwrap();
        assert_eq!(cli.commits, vec!["abc1234", "-", "stash@{0}"]);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "vdiff",
            "--theme",
            "dracula",
            "--log-file",
            "/tmp/x.log",
            "--commits",
            "deadbeef",
        ])
        .unwrap();
        assert_eq!(cli.theme.as_deref(), Some("dracula"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/x.log")));
        assert_eq!(cli.commits, vec!["deadbeef"]);
    }
}
