/*============================================================
  Synavera Project: Apti
  Module: apti::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Apti error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts carry package names and command lines only;
    no user input beyond the requested packages is echoed.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate recoverable failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2024-11-04 COD  Established shared error definitions.
    2025-11-12 COD  Reworked taxonomy around aptitude workflows.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Apti operations.
pub type Result<T> = std::result::Result<T, AptiError>;

/// Enumerates high-level error domains surfaced by Apti.
#[derive(Debug, Error)]
pub enum AptiError {
    #[error("Required command `{command}` not found in PATH")]
    CommandMissing { command: String },
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailure {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("Configuration: {0}")]
    Config(String),
    #[error("{0}")]
    PackagesNotFound(String),
    #[error("{0}")]
    AlreadyInstalled(String),
    #[error("{0}")]
    NotInstalled(String),
    #[error("Parse: {0}")]
    Parse(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AptiError {
    /// Map error category to a deterministic exit status.
    pub fn status(&self) -> u8 {
        match self {
            AptiError::PackagesNotFound(_)
            | AptiError::AlreadyInstalled(_)
            | AptiError::NotInstalled(_) => 1,
            AptiError::CommandMissing { .. } => 10,
            AptiError::CommandFailure { .. } => 11,
            AptiError::Config(_) => 20,
            AptiError::Parse(_) => 31,
            AptiError::Filesystem(_) => 40,
            AptiError::Io(_) => 41,
            AptiError::Runtime(_) => 50,
        }
    }

    /// Exit code handed back to the shell.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}
