//! Error types for target-token emission.
//!
//! A construct with no target spelling of its own that was never lowered is a pipeline bug, reported as an internal
//! `StaleErasedConstruct` diagnostic. A source name that is not a target identifier is a user error.

use crate::frontend::diagnostics::CompileError;

/// Error during emission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Stale(CompileError),
    #[error(transparent)]
    InvalidName(CompileError),
}

impl EmitError {
    pub fn diagnostic(&self) -> &CompileError {
        match self {
            EmitError::Stale(err) | EmitError::InvalidName(err) => err,
        }
    }
}

impl From<EmitError> for CompileError {
    fn from(e: EmitError) -> Self {
        match e {
            EmitError::Stale(err) | EmitError::InvalidName(err) => err,
        }
    }
}
