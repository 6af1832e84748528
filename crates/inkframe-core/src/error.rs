//! Structured compile errors.
//!
//! Every failure of the scene compiler is local, synchronous and caused by
//! malformed input, so a single error type covers them all: an [`ErrorKind`]
//! that names the class of failure plus a human readable detail.
//!
//! A [`CompileError`] serialises to the wire shape consumed by callers:
//!
//! ```
//! # use inkframe_core::error::{CompileError, ErrorKind};
//! let err = CompileError::new(ErrorKind::UnresolvedReference, "connector names `z`");
//! assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
//! assert_eq!(err.to_string(), "UnresolvedReference: connector names `z`");
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The class of a compile failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Non-finite coordinates or a negative size, rejected before expansion.
    MalformedGeometry,

    /// A connector names an id that is not present in the current scene.
    UnresolvedReference,

    /// A frame references a vocabulary entity that was never declared.
    UnknownVocabularyKey,

    /// A semantic shape was recognised but its bounds are too small to
    /// produce a valid composite.
    ExpansionFailure,

    /// The input decodes but is structurally invalid (for example a
    /// connector naming only one endpoint).
    MalformedInput,

    /// Two primitives of one scene, or two vocabulary declarations, share
    /// an identifier.
    DuplicateId,
}

impl ErrorKind {
    /// Returns the stable name of this kind, as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedGeometry => "MalformedGeometry",
            Self::UnresolvedReference => "UnresolvedReference",
            Self::UnknownVocabularyKey => "UnknownVocabularyKey",
            Self::ExpansionFailure => "ExpansionFailure",
            Self::MalformedInput => "MalformedInput",
            Self::DuplicateId => "DuplicateId",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compile failure, reported to the caller instead of a partial scene.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{error}: {detail}")]
pub struct CompileError {
    error: ErrorKind,
    detail: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            error: kind,
            detail: detail.into(),
        }
    }

    /// Returns the class of this failure.
    pub fn kind(&self) -> ErrorKind {
        self.error
    }

    /// Returns the human readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Prefixes the detail with some context, keeping the kind.
    pub fn context(self, context: impl fmt::Display) -> Self {
        Self {
            error: self.error,
            detail: format!("{context}: {}", self.detail),
        }
    }
}
