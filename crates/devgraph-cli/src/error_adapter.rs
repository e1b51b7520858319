//! Error adapter for converting DevgraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's error types and
//! miette's rich diagnostic formatting used in the CLI. Session errors carry
//! their source and span, so they are rendered with a snippet of the
//! offending gesture.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use devgraph::{DevgraphError, DiagramError};

/// Adapter wrapping a [`DevgraphError`] for rendering by miette.
pub struct ErrorAdapter<'a>(pub &'a DevgraphError);

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
            DevgraphError::Io(_) => "devgraph::io",
            DevgraphError::Config(_) => "devgraph::config",
            DevgraphError::Session { .. } => "devgraph::session",
            DevgraphError::Diagram(DiagramError::IllegalTransition(_)) => {
                "devgraph::illegal_transition"
            }
            DevgraphError::Diagram(_) => "devgraph::invalid_reference",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            DevgraphError::Session { .. } => {
                "devices are referred to by title, e.g. \"Sensor 1\"; arrows by `from` and `to` titles"
            }
            DevgraphError::Config(_) => "check the [geometry], [area] and [[palette]] sections",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            DevgraphError::Session { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let DevgraphError::Session {
            span: Some(span), ..
        } = &self.0
        else {
            return None;
        };
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// Convert a [`DevgraphError`] into reportable errors.
pub fn to_reportables(err: &DevgraphError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
