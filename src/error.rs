//! Error types for programmer-contract violations.
//!
//! None of these are user-facing conditions. A cancelled dialog is not an
//! error; it is reported through [`crate::dialogs::DialogOutcome::Cancelled`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("'ref' must be a mount callback, got {found}")]
    InvalidRef { found: &'static str },
    #[error("component {component} requires property '{property}'")]
    MissingProperty {
        component: &'static str,
        property: &'static str,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    #[error("a drag session already holds pointer capture")]
    CaptureActive,
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("dialog is not shown")]
    NotShown,
    #[error("failed to build dialog contents: {0}")]
    Build(#[from] BuildError),
}
