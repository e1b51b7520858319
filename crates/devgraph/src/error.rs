//! Error types for devgraph operations.
//!
//! [`DiagramError`] covers the diagram model itself: dangling references and
//! rejected state transitions. [`DevgraphError`] is the top-level error used
//! by front ends that load configuration and replay sessions.

use std::{io, ops::Range};

use thiserror::Error;

use crate::{arrow::ArrowId, device::DeviceId};

/// Errors raised by the diagram model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagramError {
    /// A device id that is not (or no longer) part of the diagram.
    #[error("unknown device {0}")]
    UnknownDevice(DeviceId),

    /// An arrow id that is not (or no longer) part of the diagram.
    #[error("unknown arrow {0}")]
    UnknownArrow(ArrowId),

    /// An operation that is not valid in the current state, such as
    /// committing an arrow without an end device.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),
}

impl DiagramError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalTransition(reason.into())
    }
}

/// The main error type for devgraph front ends.
///
/// # Diagnostic Variants
///
/// The `Session` variant keeps the session source and the byte span of the
/// offending input so callers can render a source snippet.
#[derive(Debug, Error)]
pub enum DevgraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}")]
    Session {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },

    #[error("Diagram error: {0}")]
    Diagram(#[from] DiagramError),
}

impl DevgraphError {
    /// Create a new `Session` error with the associated source.
    pub fn new_session_error(
        message: impl Into<String>,
        src: impl Into<String>,
        span: Option<Range<usize>>,
    ) -> Self {
        Self::Session {
            message: message.into(),
            src: src.into(),
            span,
        }
    }
}
