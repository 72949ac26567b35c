//! Error taxonomy for ABI checking
//!
//! A divergence between the reference snapshot and the current library is
//! not an error: it is reported through `commands::CheckOutcome`.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Exit code for a missing required command-line argument
pub const CONFIGURATION_EXIT_CODE: i32 = -2;

/// Exit code when the exported symbol set differs from the reference
pub const DIVERGENCE_EXIT_CODE: i32 = -1;

/// Errors that abort an ABI check or dump
#[derive(Error, Debug)]
pub enum AbiCheckError {
    #[error("failed to run {tool}: {source}")]
    ToolInvocation {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{tool} produced output that is not valid UTF-8")]
    InvalidUtf8 { tool: PathBuf },

    #[error("cannot read reference snapshot {path}: {source}")]
    MissingReference {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Configuration(String),

    #[error("invalid ignore list {path}: {reason}")]
    IgnoreList { path: PathBuf, reason: String },

    #[error("failed to write snapshot {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AbiCheckError {
    /// Whether the failure happened before any work was attempted
    pub fn is_configuration(&self) -> bool {
        matches!(self, AbiCheckError::Configuration(_))
    }
}

/// Result type for ABI check operations
pub type Result<T> = std::result::Result<T, AbiCheckError>;
