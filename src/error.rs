//! Error types and exit codes for grovedoc.
//!
//! Per-file problems (syntax errors, bad package descriptions, class
//! collisions) are not errors at this level: they become diagnostics and the
//! run carries on. `GrovedocError` covers what does stop a run: bad arguments
//! or configuration, an unreadable source path, and misuse of the root
//! document after it was resolved.
//!
//! ## Exit Codes
//!
//! - `2`: invalid arguments or configuration
//! - `3`: a source root or configuration file does not exist
//! - `10`: internal errors (I/O failures, document lifecycle violations)

use std::fmt;
use std::io;
use std::path::PathBuf;

use grovedoc_core::error::DocError;
use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric codes used as CLI exit codes and in JSON error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or configuration.
    InvalidArguments = 2,
    /// A named path does not exist.
    NotFound = 3,
    /// Internal errors.
    InternalError = 10,
}

impl OutputErrorCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Errors that end a grovedoc run.
#[derive(Debug, Error)]
pub enum GrovedocError {
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Document(#[from] DocError),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl GrovedocError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        GrovedocError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GrovedocError::Internal {
            message: message.into(),
        }
    }

    /// Wrap an I/O error for `path`; a missing path becomes [`GrovedocError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            GrovedocError::NotFound { path }
        } else {
            GrovedocError::Io { path, source }
        }
    }
}

impl From<&GrovedocError> for OutputErrorCode {
    fn from(err: &GrovedocError) -> Self {
        match err {
            GrovedocError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            GrovedocError::Config { .. } => OutputErrorCode::InvalidArguments,
            GrovedocError::NotFound { .. } => OutputErrorCode::NotFound,
            GrovedocError::Io { .. } => OutputErrorCode::InternalError,
            GrovedocError::Document(_) => OutputErrorCode::InternalError,
            GrovedocError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
