//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum SimionError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A variable name is not declared in the descriptor.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A variable is declared twice in the same descriptor.
    #[error("Variable declared twice: {0}")]
    DuplicateVariable(String),

    /// A variable is declared with `max <= min`.
    #[error("Variable {0} has an empty value range")]
    EmptyRange(String),

    /// A feature map or a function approximator was used before deferred load.
    #[error("{0} used before the deferred load step")]
    NotLoaded(&'static str),

    /// Deferred load steps were drained twice.
    #[error("Deferred load steps have already been executed")]
    DeferredLoadAlreadyDone,

    /// A tuple was requested from an empty replay buffer.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyReplayBuffer,

    /// An action was recorded with a probability that cannot weight a sample.
    #[error("Invalid action probability: {0}")]
    InvalidProbability(f64),

    /// Invalid configuration value.
    #[error("Invalid configuration {0}: {1}")]
    InvalidConfig(String, String),
}
