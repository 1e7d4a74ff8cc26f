//! File logging for the submission store.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Keep visitor contact details out of log files.
//!
//! # Invariants
//! - Store events carry ids, counts and operation names only; submission
//!   contents are never passed to the logger.
//! - Panic payloads may echo form input and are redacted before logging:
//!   email-like and phone-like tokens are masked.
//! - Repeating init with the same level and directory is a no-op; any other
//!   reconfiguration is rejected.
//! - Initialization never panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecBuilder, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "contactdesk";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;
const PHONE_MIN_DIGITS: usize = 7;
const EMAIL_MASK: &str = "<email>";
const PHONE_MASK: &str = "<phone>";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: LevelFilter,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// Accepts `off|error|warn|warning|info|debug|trace`, case-insensitive.
///
/// # Errors
/// - Unsupported level, or a relative or empty `log_dir`.
/// - Logging already running with another level or directory.
/// - Directory creation or logger backend failure.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = check_log_dir(log_dir.as_ref())?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, log_dir))?;
    state.ensure_matches(level, log_dir)
}

/// Returns the default log level for current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

impl LoggingState {
    fn ensure_matches(&self, level: LevelFilter, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already writes to `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already runs at `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

fn start_logger(level: LevelFilter, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", log_dir.display()))?;

    // Direct writes: the admin CLI exits right after one store call, so
    // buffered lines would be lost.
    let logger = Logger::with(LogSpecBuilder::new().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=logging_init module=core status=ok level={} version={} platform={}",
        level,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let trimmed = level.trim();
    let canonical = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    canonical.parse::<LevelFilter>().map_err(|_| {
        format!("unsupported log level `{trimmed}`; expected off|error|warn|info|debug|trace")
    })
}

fn check_log_dir(log_dir: &Path) -> Result<&Path, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if !log_dir.is_absolute() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            log_dir.display()
        ));
    }
    Ok(log_dir)
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            redact_payload(message)
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            redact_payload(message)
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));
}

/// Masks contact details, flattens to one line, and caps the length.
fn redact_payload(value: &str) -> String {
    let flattened = value
        .split_whitespace()
        .map(redact_token)
        .collect::<Vec<_>>()
        .join(" ");

    let mut capped = flattened
        .chars()
        .take(MAX_PANIC_PAYLOAD_CHARS)
        .collect::<String>();
    if flattened.chars().count() > MAX_PANIC_PAYLOAD_CHARS {
        capped.push_str("...");
    }
    capped
}

fn redact_token(token: &str) -> &str {
    if token.contains('@') {
        return EMAIL_MASK;
    }
    let phone_like = token
        .chars()
        .all(|c| c.is_ascii_digit() || "+-().,'\"".contains(c));
    let digits = token.chars().filter(char::is_ascii_digit).count();
    if phone_like && digits >= PHONE_MIN_DIGITS {
        return PHONE_MASK;
    }
    token
}

#[cfg(test)]
mod tests {
    use super::{check_log_dir, init_logging, parse_level, redact_payload, LOGGING_STATE};
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn parse_level_accepts_aliases_and_case() {
        assert_eq!(parse_level(" WARNING ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("Info").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("verbose").unwrap_err().contains("verbose"));
    }

    #[test]
    fn check_log_dir_rejects_relative_and_empty_paths() {
        assert!(check_log_dir(Path::new("logs/dev"))
            .unwrap_err()
            .contains("absolute"));
        assert!(check_log_dir(Path::new("")).is_err());
    }

    #[test]
    fn redaction_masks_emails_and_phone_numbers() {
        let redacted =
            redact_payload("failed to store Ali a@x.com\nphone +966-0500000000 count 12");

        assert_eq!(
            redacted,
            "failed to store Ali <email> phone <phone> count 12"
        );
    }

    #[test]
    fn redaction_keeps_ids_and_caps_length() {
        let id = "3f2b9c1e-7a44-4d1a-9b0e-5c8d2f6a1b3c";
        assert_eq!(redact_payload(id), id);

        let long = "x ".repeat(200);
        let redacted = redact_payload(&long);
        assert!(redacted.ends_with("..."));
        assert_eq!(redacted.chars().count(), 163);
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", log_dir.path()).unwrap();
        init_logging("INFO", log_dir.path()).unwrap();

        assert!(init_logging("debug", log_dir.path())
            .unwrap_err()
            .contains("refusing to switch"));
        assert!(init_logging("info", other_dir.path())
            .unwrap_err()
            .contains("refusing to switch"));

        let state = LOGGING_STATE.get().unwrap();
        assert_eq!(state.level, LevelFilter::Info);
        assert_eq!(state.log_dir, log_dir.path());
    }
}
