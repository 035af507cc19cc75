/*============================================================
  Synavera Project: Apti
  Module: apti::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Provide structured, append-only logging for Apti sessions:
    simulations run, plans shown, answers given, commands run.

  Security / Safety Notes:
    Entries record package names and aptitude command lines;
    no environment or credential data is logged.

  Dependencies:
    chrono for UTC stamps, sha2 for session integrity digests.

  Operational Scope:
    Always echoes warnings and errors to stderr; everything goes
    to stderr with --verbose and to a session file when one is
    configured.

  Revision History:
    2024-11-04 COD  Established logging module.
    2025-11-12 COD  Session files named per Apti invocation.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{AptiError, Result};

/// Structured log level for Apti events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn always_echoed(self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// Session log file name for a start time.
pub fn session_file_name(started: DateTime<Utc>) -> String {
    format!("apti_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

fn format_entry(timestamp: &str, level: LogLevel, code: &str, message: &str) -> String {
    format!("{timestamp} [{}] [{code}] {message}", level.as_str())
}

/// Shared logger that emits append-only entries.
pub struct Logger {
    file: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    verbose: bool,
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let file = if let Some(ref file_path) = path {
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    AptiError::Filesystem(format!(
                        "Failed to create log directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)
                .map_err(|err| {
                    AptiError::Filesystem(format!(
                        "Failed to open log file {}: {err}",
                        file_path.display()
                    ))
                })?;
            Some(Mutex::new(BufWriter::new(file)))
        } else {
            None
        };

        Ok(Self {
            file,
            path,
            verbose,
        })
    }

    /// Logger for one invocation: an explicit file wins over `log_dir`.
    pub fn for_session(
        explicit: Option<PathBuf>,
        log_dir: Option<&Path>,
        verbose: bool,
    ) -> Result<Self> {
        let path = explicit.or_else(|| log_dir.map(|dir| dir.join(session_file_name(Utc::now()))));
        Self::new(path, verbose)
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let payload = format_entry(&timestamp, level, code, message.as_ref());

        if self.verbose || level.always_echoed() {
            eprintln!("{payload}");
        }

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                if writeln!(guard, "{payload}").is_err() {
                    eprintln!(
                        "{}",
                        format_entry(&timestamp, LogLevel::Error, "LOGGER", "Failed to write to log file")
                    );
                }
                if guard.flush().is_err() {
                    eprintln!(
                        "{}",
                        format_entry(&timestamp, LogLevel::Warn, "LOGGER", "Failed to flush log writer")
                    );
                }
            }
        }
    }

    /// Convenience wrapper for `INFO` level events.
    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    /// Convenience wrapper for `WARN` level events.
    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    /// Convenience wrapper for `ERROR` level events.
    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    /// Convenience wrapper for `DEBUG` level events.
    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Compute and persist SHA-256 digest of the log file.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let data = std::fs::read(path).map_err(|err| {
            AptiError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);
        let hash_path = digest_path(path);
        let mut file = File::create(&hash_path).map_err(|err| {
            AptiError::Filesystem(format!(
                "Failed to create hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        writeln!(
            file,
            "{:x}  {}",
            digest,
            path.file_name().unwrap_or_default().to_string_lossy()
        )
        .map_err(|err| {
            AptiError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        Ok(())
    }
}

fn digest_path(path: &Path) -> PathBuf {
    let mut hash_os = path.as_os_str().to_os_string();
    hash_os.push(".hash");
    PathBuf::from(hash_os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_names_are_timestamped() {
        let started = Utc.with_ymd_and_hms(2025, 11, 12, 8, 5, 9).unwrap();
        assert_eq!(session_file_name(started), "apti_2025-11-12_08-05-09.log");
    }

    #[test]
    fn entries_carry_level_and_code() {
        assert_eq!(
            format_entry("2025-11-12T08:05:09Z", LogLevel::Warn, "PLAN", "nothing"),
            "2025-11-12T08:05:09Z [WARN] [PLAN] nothing"
        );
    }

    #[test]
    fn no_file_without_path_or_dir() {
        let logger = Logger::for_session(None, None, false).unwrap();
        assert!(logger.path().is_none());
        logger.finalize().unwrap();
    }

    #[test]
    fn writes_entries_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::for_session(None, Some(dir.path().join("logs").as_path()), false).unwrap();
        logger.info("INIT", "session opened");
        logger.debug("PLAN", "3 records");
        logger.finalize().unwrap();

        let path = logger.path().unwrap().to_path_buf();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("[INFO] [INIT] session opened"));

        let digest = std::fs::read_to_string(digest_path(&path)).unwrap();
        let expected = format!("{:x}", Sha256::digest(contents.as_bytes()));
        assert!(digest.starts_with(&expected));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("mine.log");
        let logger =
            Logger::for_session(Some(explicit.clone()), Some(dir.path()), false).unwrap();
        assert_eq!(logger.path(), Some(explicit.as_path()));
    }
}
