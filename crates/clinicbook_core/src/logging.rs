//! Rolling file logs for the shell process.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend from [`AppConfig`] once per process.
//! - Keep events metadata-only: command words, codes, counts, durations.
//!
//! # Invariants
//! - Patient field values never reach a log line, panics included.
//! - A second start with other settings is rejected, never applied.

use crate::config::{AppConfig, LogSettings};
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "clinicbook";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(FlexiLoggerError),
    /// Logging already runs with other settings.
    AlreadyActive(LogSettings),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "cannot start logger: {err}"),
            Self::AlreadyActive(active) => write!(
                f,
                "logging already active at `{}` with level `{}`",
                active.dir.display(),
                active.level
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::AlreadyActive(_) => None,
        }
    }
}

/// Starts file logging when `config` names a log directory.
///
/// Returns `false` when logging is not configured. Calling again with the
/// same settings is a no-op.
///
/// # Errors
/// - `CreateDir` when the directory cannot be created.
/// - `Backend` when `flexi_logger` refuses the setup.
/// - `AlreadyActive` when a different directory or level is already running.
pub fn init_logging(config: &AppConfig) -> Result<bool, LoggingError> {
    let Some(settings) = config.log.as_ref() else {
        return Ok(false);
    };

    let active = ACTIVE.get_or_try_init(|| start(settings))?;
    if &active.settings != settings {
        return Err(LoggingError::AlreadyActive(active.settings.clone()));
    }

    info!(
        "event=app_start module=logging status=ok version={} data_file={}",
        env!("CARGO_PKG_VERSION"),
        config.data_file.display()
    );
    Ok(true)
}

fn start(settings: &LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={} log_dir={}",
        settings.level,
        settings.dir.display()
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(
            "event=panic module=logging status=error location={location} summary={}",
            one_line_summary(&payload)
        );
        previous(info);
    }));
}

/// Payloads may quote user input: flatten to one line and cap the length.
fn one_line_summary(payload: &str) -> String {
    let flat: String = payload
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    if flat.chars().count() <= PANIC_SUMMARY_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(PANIC_SUMMARY_CHARS).collect();
    cut.push_str("...");
    cut
}
