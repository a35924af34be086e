use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::VdiffError;

/// Synchronous process execution. Returns captured stdout on success.
pub trait CommandRunner {
    fn run(&self, argv: &[String]) -> Result<String, VdiffError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
        (**self).run(argv)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
        (**self).run(argv)
    }
}

/// Runs real processes from a fixed working directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    workdir: PathBuf,
}

impl ProcessRunner {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
        let (program, args) = argv.split_first().ok_or(VdiffError::EmptyCommand)?;
        let command = shell_words::join(argv);
        debug!(%command, "spawning");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| VdiffError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(%command, code = ?output.status.code(), "command failed");
            return Err(VdiffError::ExternalTool {
                command,
                code: output.status.code(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
