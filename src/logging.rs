use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::dirs_home;

/// Filter directives are read from this variable, e.g. `VDIFF_LOG=debug`.
pub const LOG_ENV: &str = "VDIFF_LOG";

/// `$XDG_STATE_HOME/vdiff/vdiff.log`, else `~/.local/state/vdiff/vdiff.log`.
pub fn default_log_path() -> PathBuf {
    let state_dir = std::env::var_os("XDG_STATE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs_home().map(|home| home.join(".local").join("state")))
        .unwrap_or_else(|| PathBuf::from("."));
    state_dir.join("vdiff").join("vdiff.log")
}

/// Route `tracing` events to an append-only file. The terminal belongs to
/// the UI, so nothing is ever written to stdout or stderr.
///
/// The returned guard flushes pending lines on drop and must outlive the UI.
pub fn init(path: &Path) -> Result<WorkerGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let (writer, guard) = non_blocking(file);

    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

/// Like [`init`], but a log file that can't be opened just means no logs.
pub fn init_or_disable(path: &Path) -> Option<WorkerGuard> {
    init(path).ok()
}
