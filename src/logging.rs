use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{AppError, AppResult};

pub const LOG_ENV_VAR: &str = "GTOUR_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appends to a file. The terminal host uses this so logs stay off the alternate screen.
    File(PathBuf),
    /// No subscriber is installed.
    Discard,
}

/// `GTOUR_LOG` directives, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init(target: &LogTarget) -> AppResult<()> {
    let registry = tracing_subscriber::registry().with(env_filter());
    let installed = match target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        LogTarget::Discard => return Ok(()),
    };
    installed.map_err(|err| AppError::unsupported(format!("logging already initialized: {err}")))
}

fn open_log_file(path: &Path) -> AppResult<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to create log directory: {}", parent.display()),
            )
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log file: {}", path.display()))
        })
}
