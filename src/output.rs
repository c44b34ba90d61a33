//! JSON output types for the CLI.
//!
//! Every run prints exactly one JSON document on stdout: a [`BuildResponse`]
//! on success, an [`ErrorResponse`] when the run stops early.
//!
//! 1. **Always JSON:** no mixed text and JSON on stdout
//! 2. **Status first:** every response starts with `status`
//! 3. **Deterministic:** packages and classes are sorted by name

use std::io::{self, Write};

use serde::Serialize;

use grovedoc_core::diagnostics::{Diagnostic, Diagnostics};
use grovedoc_core::model::ClassDoc;
use grovedoc_core::root::{ResolveSummary, RootDoc};

use crate::error::{GrovedocError, OutputErrorCode};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Root Summary
// ============================================================================

/// One package of the finalized root.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package path with `/` separators.
    pub path: String,
    /// Dotted package name.
    pub name: String,
    pub description: String,
    /// Class names within the package, sorted.
    pub classes: Vec<String>,
}

/// One class of the finalized root.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassInfo {
    pub qualified_name: String,
    pub kind: String,
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<SuperclassInfo>,
}

/// Superclass reference and whether it linked to a class of this run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuperclassInfo {
    pub name: String,
    pub resolved: bool,
}

impl ClassInfo {
    pub fn from_doc(doc: &ClassDoc) -> Self {
        ClassInfo {
            qualified_name: doc.qualified_name(),
            kind: doc.kind.as_str().to_string(),
            source_file: doc.source_file.clone(),
            superclass: doc.superclass.as_ref().map(|s| SuperclassInfo {
                name: s.name.clone(),
                resolved: s.is_resolved(),
            }),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub packages: Vec<PackageInfo>,
    pub classes: Vec<ClassInfo>,
    pub resolution: ResolveSummary,
    /// One entry per skipped file or policy event, in report order.
    pub diagnostics: Vec<Diagnostic>,
    /// Full class documents, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<ClassDoc>>,
}

impl BuildResponse {
    /// Summarize a resolved root.
    pub fn new(root: &RootDoc, resolution: ResolveSummary, diagnostics: &Diagnostics) -> Self {
        let packages = root
            .packages()
            .map(|package| PackageInfo {
                path: package.name().to_string(),
                name: package.dotted_name(),
                description: package.description().to_string(),
                classes: package.class_names().map(str::to_string).collect(),
            })
            .collect();

        let mut classes: Vec<ClassInfo> = root
            .classes()
            .map(|(_, doc)| ClassInfo::from_doc(doc))
            .collect();
        classes.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        BuildResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            packages,
            classes,
            resolution,
            diagnostics: diagnostics.entries().to_vec(),
            documents: None,
        }
    }

    /// Attach every class document, sorted by qualified name.
    pub fn with_documents(mut self, root: &RootDoc) -> Self {
        let mut documents: Vec<ClassDoc> = root.classes().map(|(_, doc)| doc.clone()).collect();
        documents.sort_by_key(|doc| doc.qualified_name());
        self.documents = Some(documents);
        self
    }
}

/// Error information for error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code, same as the exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &GrovedocError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let details = match err {
            GrovedocError::NotFound { path }
            | GrovedocError::Io { path, .. }
            | GrovedocError::Config { path, .. } => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        };
        ErrorInfo {
            code,
            message: err.to_string(),
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &GrovedocError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
