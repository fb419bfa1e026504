//! Common state machine error types
//!
//! Shared across all domain crates that implement state machines.

use thiserror::Error;

use crate::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidTransition { from, event } => Error::Validation(format!(
                "Cannot {} from '{}' state",
                event.replace('_', " "),
                from
            )),
            StateError::TerminalState(state) => Error::Validation(format!(
                "'{}' is a terminal state and cannot transition",
                state
            )),
            StateError::GuardFailed(msg) => Error::Validation(msg),
        }
    }
}
