//! Error types for inkframe operations.
//!
//! [`InkframeError`] wraps every failure of the facade: reading input,
//! decoding JSON, compiling, configuration and export.

use std::io;

use thiserror::Error;

use inkframe_core::error::CompileError;

/// The main error type for inkframe operations.
///
/// The `Compile` variant carries the structured [`CompileError`], whose kind
/// front ends map to diagnostics.
#[derive(Debug, Error)]
pub enum InkframeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl InkframeError {
    /// Returns the compile error inside, if this is one.
    pub fn as_compile_error(&self) -> Option<&CompileError> {
        match self {
            Self::Compile(err) => Some(err),
            _ => None,
        }
    }
}
