//! Scheduler error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by the scheduler and its models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// Input rejected at construction, before any mutation.
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),
    /// An operation was called in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<Vec<ValidationError>> for SchedulerError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SchedulerError::InvalidInput(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
