//! The crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Errors are plain data
//! (`Clone + PartialEq`) so tests can match on them directly; foreign errors
//! are flattened to their message on conversion.

use std::fmt;

pub type Result<T> = std::result::Result<T, DqnError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DqnError {
    /// A state, batch or parameter tensor had the wrong shape
    DimensionMismatch { expected: String, actual: String },

    /// A configuration value or call argument is out of range
    InvalidParameter { name: String, reason: String },

    /// Action index outside `0..max_actions`
    InvalidAction { action: usize, max_actions: usize },

    /// Sampling or learning was asked for with no experiences
    EmptyBuffer(String),

    /// A NaN or infinity turned up in Q-values, losses or gradients
    NumericalError(String),

    /// `backward_batch` ran on a layer that has not seen a forward pass
    NoForwardPass,

    /// Reset or step on an environment after `close()`
    EnvironmentClosed,

    /// Checkpoint or config file could not be read or written
    IoError(String),

    /// Checkpoint or config contents could not be encoded or decoded
    SerializationError(String),

    /// The score plot could not be encoded
    PlotError(String),
}

impl fmt::Display for DqnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqnError::DimensionMismatch { expected, actual } => {
                write!(f, "shape mismatch: wanted {}, found {}", expected, actual)
            }
            DqnError::InvalidParameter { name, reason } => write!(f, "bad value for `{}`: {}", name, reason),
            DqnError::InvalidAction { action, max_actions } => {
                write!(f, "action {} does not exist (the environment has {} actions)", action, max_actions)
            }
            DqnError::EmptyBuffer(what) => write!(f, "nothing to learn from: {}", what),
            DqnError::NumericalError(what) => write!(f, "non-finite value: {}", what),
            DqnError::NoForwardPass => write!(f, "layer has no cached forward pass to backpropagate through"),
            DqnError::EnvironmentClosed => write!(f, "the environment is closed"),
            DqnError::IoError(msg) => write!(f, "file access failed: {}", msg),
            DqnError::SerializationError(msg) => write!(f, "could not (de)serialize: {}", msg),
            DqnError::PlotError(msg) => write!(f, "could not write the score plot: {}", msg),
        }
    }
}

impl std::error::Error for DqnError {}

impl From<std::io::Error> for DqnError {
    fn from(err: std::io::Error) -> Self {
        DqnError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::SerializationError(format!("checkpoint: {}", err))
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::SerializationError(format!("config: {}", err))
    }
}

impl From<image::ImageError> for DqnError {
    fn from(err: image::ImageError) -> Self {
        DqnError::PlotError(err.to_string())
    }
}

impl DqnError {
    pub fn dimension_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = DqnError::invalid_parameter("eps_decay", "must be within (0, 1]");
        assert_eq!(err.to_string(), "bad value for `eps_decay`: must be within (0, 1]");
        let err = DqnError::InvalidAction { action: 7, max_actions: 4 };
        assert!(err.to_string().contains("has 4 actions"));
    }

    #[test]
    fn io_errors_keep_their_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "checkpoint.bin");
        assert_eq!(DqnError::from(io), DqnError::IoError("checkpoint.bin".to_string()));
    }
}
