//! Error types for grovedoc-core.
//!
//! Two families of errors live here:
//!
//! - [`ParseError`]: per-file front-end failures. These never abort a batch;
//!   the aggregator turns them into [`Diagnostic`](crate::diagnostics::Diagnostic)
//!   entries and skips the file. The grammar/token-stream distinction is kept
//!   because the two are reported under different labels.
//! - [`DocError`]: violations of the document model's lifecycle, such as
//!   mutating a root document after it has been resolved.

use thiserror::Error;

use crate::diagnostics::DiagnosticCategory;
use crate::tree::Position;

// ============================================================================
// Parse Errors
// ============================================================================

/// A front-end failure for a single source file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Structural parse failure: the tokens do not form a valid declaration,
    /// including an unexpected end of input. Also raised when a tree rewrite
    /// pass meets a node it cannot express in the primary vocabulary.
    #[error("syntax error at {pos}: {message}")]
    Grammar { pos: Position, message: String },

    /// Lexical failure: the source cannot be split into tokens.
    #[error("token stream error at {pos}: {message}")]
    TokenStream { pos: Position, message: String },
}

impl ParseError {
    /// Create a grammar error.
    pub fn grammar(pos: Position, message: impl Into<String>) -> Self {
        ParseError::Grammar {
            pos,
            message: message.into(),
        }
    }

    /// Create a token-stream error.
    pub fn token_stream(pos: Position, message: impl Into<String>) -> Self {
        ParseError::TokenStream {
            pos,
            message: message.into(),
        }
    }

    /// Position the error was detected at.
    pub fn pos(&self) -> Position {
        match self {
            ParseError::Grammar { pos, .. } | ParseError::TokenStream { pos, .. } => *pos,
        }
    }

    /// Diagnostic category this error is reported under.
    pub fn category(&self) -> DiagnosticCategory {
        match self {
            ParseError::Grammar { .. } => DiagnosticCategory::Grammar,
            ParseError::TokenStream { .. } => DiagnosticCategory::TokenStream,
        }
    }
}

/// Result type for front-end operations.
pub type ParseResult<T> = Result<T, ParseError>;

// ============================================================================
// Document Model Errors
// ============================================================================

/// Error raised by the document model.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocError {
    /// The root document was already resolved; it no longer accepts classes
    /// or package descriptions.
    #[error("root document is resolved; cannot {operation}")]
    AlreadyResolved { operation: String },

    /// A class handle does not belong to this root document.
    #[error("unknown class handle: {id}")]
    UnknownClass { id: u32 },
}

impl DocError {
    pub(crate) fn already_resolved(operation: impl Into<String>) -> Self {
        DocError::AlreadyResolved {
            operation: operation.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
