use super::error::VdiffError;
use super::reference::{Reference, ReferenceKind};

/// Flags that already control `git log` output shape.
const FORMAT_FLAGS: &[&str] = &["--pretty", "--format", "--oneline"];

/// Builds the argv for every git invocation the browser makes.
#[derive(Debug, Clone)]
pub struct GitCommands {
    program: String,
    format_flag: String,
}

impl GitCommands {
    pub fn new(program: &str, format_flag: &str) -> Self {
        Self {
            program: program.to_string(),
            format_flag: format_flag.to_string(),
        }
    }

    /// `git show` for a commit, `git stash show -p` for a stash slot.
    pub fn patch_args(&self, reference: &Reference) -> Vec<String> {
        let mut argv = vec![self.program.clone()];
        match reference.kind() {
            ReferenceKind::Commit => argv.extend(["show".to_string(), "--no-color".to_string()]),
            ReferenceKind::Stash => argv.extend([
                "stash".to_string(),
                "show".to_string(),
                "-p".to_string(),
                "--no-color".to_string(),
            ]),
        }
        argv.push(reference.as_str().to_string());
        argv
    }

    /// The listing used when no references were given: `git log <format flag>`.
    pub fn default_listing(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            "log".to_string(),
            self.format_flag.clone(),
        ]
    }

    /// Append the one-hash-per-line format flag unless the user already picked
    /// an output format. `git stash ...` is left alone since its listing
    /// already starts each line with the slot name.
    pub fn with_format_flag(&self, mut argv: Vec<String>) -> Vec<String> {
        if argv.get(1).is_some_and(|sub| sub == "stash") {
            return argv;
        }
        let has_format = argv.iter().skip(1).any(|arg| {
            FORMAT_FLAGS
                .iter()
                .any(|flag| arg == flag || arg.starts_with(&format!("{flag}=")))
        });
        if !has_format {
            argv.push(self.format_flag.clone());
        }
        argv
    }
}

impl GitCommands {
    /// Tokenize a query typed into the command bar with shell quoting rules
    /// and add the format flag where needed.
    pub fn query_args(&self, line: &str) -> Result<Vec<String>, VdiffError> {
        let argv = shell_words::split(line)?;
        if argv.is_empty() {
            return Err(VdiffError::EmptyCommand);
        }
        Ok(self.with_format_flag(argv))
    }
}

impl Default for GitCommands {
    fn default() -> Self {
        Self::new("git", "--pretty=%h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        shell_words::split(s).unwrap()
    }

    #[test]
    fn test_commit_patch_args() {
        let r = Reference::parse("abc1234").unwrap();
        assert_eq!(
            GitCommands::default().patch_args(&r),
            argv("git show --no-color abc1234")
        );
    }

    #[test]
    fn test_stash_patch_args() {
        let r = Reference::parse("stash@{2}").unwrap();
        assert_eq!(
            GitCommands::default().patch_args(&r),
            vec!["git", "stash", "show", "-p", "--no-color", "stash@{2}"]
        );
    }

    #[test]
    fn test_custom_program() {
        let cmds = GitCommands::new("/usr/local/bin/git", "--format=%H");
        assert_eq!(
            cmds.default_listing(),
            vec!["/usr/local/bin/git", "log", "--format=%H"]
        );
    }

    #[test]
    fn test_format_flag_appended() {
        let cmds = GitCommands::default();
        assert_eq!(
            cmds.with_format_flag(argv("git log -n 20 --author 'Jo Doe'")),
            argv("git log -n 20 --author 'Jo Doe' --pretty=%h")
        );
    }

    #[test]
    fn test_existing_format_kept() {
        let cmds = GitCommands::default();
        for line in [
            "git log --pretty=oneline",
            "git log --format=%H",
            "git log --oneline --all",
        ] {
            assert_eq!(cmds.with_format_flag(argv(line)), argv(line));
        }
    }

    #[test]
    fn test_stash_listing_untouched() {
        let cmds = GitCommands::default();
        assert_eq!(
            cmds.with_format_flag(argv("git stash list")),
            argv("git stash list")
        );
    }

    #[test]
    fn test_query_args() {
        let cmds = GitCommands::default();
        assert_eq!(
            cmds.query_args("git log --author 'Jo Doe'").unwrap(),
            argv("git log --author 'Jo Doe' --pretty=%h")
        );
        assert!(matches!(cmds.query_args("  "), Err(VdiffError::EmptyCommand)));
        assert!(matches!(
            cmds.query_args("git log 'oops"),
            Err(VdiffError::CommandSyntax(_))
        ));
    }

    #[test]
    fn test_lookalike_flag_still_gets_format() {
        let cmds = GitCommands::default();
        let out = cmds.with_format_flag(argv("git log --prettyish"));
        assert_eq!(out.last().map(String::as_str), Some("--pretty=%h"));
    }
}
