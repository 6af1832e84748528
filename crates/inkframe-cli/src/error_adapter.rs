//! Error adapter for converting InkframeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Compile errors get
//! a code per error kind (`inkframe::UnresolvedReference`, ...) and a hint on
//! how to fix the input.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use inkframe::InkframeError;
use inkframe_core::error::ErrorKind;

/// Adapter implementing [`MietteDiagnostic`] for an [`InkframeError`].
pub struct ErrorAdapter<'a>(pub &'a InkframeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            InkframeError::Io(_) => "inkframe::io".to_string(),
            InkframeError::Json(_) => "inkframe::json".to_string(),
            InkframeError::Compile(err) => format!("inkframe::{}", err.kind()),
            InkframeError::Config(_) => "inkframe::config".to_string(),
            InkframeError::Export(_) => "inkframe::export".to_string(),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            InkframeError::Compile(err) => compile_help(err.kind()),
            InkframeError::Json(_) => {
                "the input must be a frame object with `shapes` and `connectors`, or a storyboard with `frames`"
            }
            InkframeError::Config(_) => "check the TOML configuration file passed with --config",
            InkframeError::Io(_) | InkframeError::Export(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn compile_help(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MalformedGeometry => "coordinates must be finite numbers and sizes must not be negative",
        ErrorKind::UnresolvedReference => {
            "connectors may only name shapes declared in the same frame"
        }
        ErrorKind::UnknownVocabularyKey => {
            "declare the entity in the storyboard's `vocabulary` before referencing it"
        }
        ErrorKind::ExpansionFailure => "make the shape larger; semantic shapes have a minimum size",
        ErrorKind::MalformedInput => {
            "the input is incomplete, for example a connector with only one endpoint"
        }
        ErrorKind::DuplicateId => "give every shape and connector in a frame a distinct id",
    }
}

#[cfg(test)]
mod tests {
    use inkframe_core::error::CompileError;

    use super::*;

    #[test]
    fn test_compile_error_code_names_kind() {
        let err = InkframeError::Compile(CompileError::new(
            ErrorKind::UnresolvedReference,
            "connector `a__z__0` names unknown id `z`",
        ));
        let adapter = ErrorAdapter(&err);

        assert_eq!(
            adapter.code().unwrap().to_string(),
            "inkframe::UnresolvedReference"
        );
        assert!(adapter.help().is_some());
        assert_eq!(
            adapter.to_string(),
            "UnresolvedReference: connector `a__z__0` names unknown id `z`"
        );
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = InkframeError::Io(std::io::Error::other("disk full"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "inkframe::io");
        assert!(adapter.help().is_none());
    }
}
