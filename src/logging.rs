//! Tracing setup for the `ssts` binary.
//!
//! Events go to stderr and to one file per run under the app `logs/`
//! directory; stdout is left to command output. Run files are named
//! `ssts_<local time>.log`, so name order is age order, and only the newest
//! [`LogOptions::keep_files`] of them survive a start.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

const RUN_FILE_PREFIX: &str = "ssts_";
const RUN_FILE_SUFFIX: &str = ".log";
/// HTTP internals stay quiet unless `RUST_LOG` asks for them.
const QUIET_TARGETS: [&str; 3] = ["ureq=warn", "reqwest=warn", "rustls=warn"];

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No config directory available for logs")]
    NoConfigDir,
    #[error("Log file access failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file name: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Where and how much to log.
#[derive(Clone, Debug)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset, e.g. `info`.
    pub default_level: String,
    pub dir: PathBuf,
    pub keep_files: usize,
}

impl LogOptions {
    /// Options for the CLI: the app logs directory and ten run files.
    pub fn for_cli(default_level: &str) -> Result<Self, LoggingError> {
        let dir = app_dirs::logs_dir().map_err(|err| match err {
            app_dirs::AppDirError::NoBaseDir => LoggingError::NoConfigDir,
            app_dirs::AppDirError::CreateDir { path, source } => LoggingError::Io { path, source },
        })?;
        Ok(Self {
            default_level: default_level.to_string(),
            dir,
            keep_files: 10,
        })
    }
}

/// Install the global subscriber once; later calls return `Ok` untouched.
pub fn init(options: &LogOptions) -> Result<PathBuf, LoggingError> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let run_file = options.dir.join(run_file_name(now)?);
    if FILE_GUARD.get().is_some() {
        return Ok(run_file);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&run_file)
        .map_err(|source| LoggingError::Io {
            path: run_file.clone(),
            source,
        })?;
    prune_run_files(&options.dir, options.keep_files)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let timer = local_timer();
    let subscriber = Registry::default()
        .with(env_filter(&options.default_level))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_timer(timer.clone())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = FILE_GUARD.set(guard);
    tracing::debug!(file = %run_file.display(), "Logging to file");
    Ok(run_file)
}

fn run_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{RUN_FILE_PREFIX}{}{RUN_FILE_SUFFIX}", now.format(STAMP)?))
}

fn is_run_file(name: &str) -> bool {
    name.starts_with(RUN_FILE_PREFIX) && name.ends_with(RUN_FILE_SUFFIX)
}

/// Delete the oldest run files so at most `keep` remain.
fn prune_run_files(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_run_file(name))
        .collect();
    if names.len() <= keep {
        return Ok(());
    }
    names.sort();
    for name in &names[..names.len() - keep] {
        let path = dir.join(name);
        fs::remove_file(&path).map_err(|source| LoggingError::Io { path, source })?;
    }
    Ok(())
}

fn local_timer() -> fmt::time::OffsetTime<&'static [FormatItem<'static>]> {
    const DISPLAY: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY)
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = vec![default_level.to_string()];
        directives.extend(QUIET_TARGETS.iter().map(|target| target.to_string()));
        EnvFilter::new(directives.join(","))
    })
}
