//! Error types for the CloudFormation custom resource SDK.
//!
//! The error hierarchy doubles as the control-flow channel for handlers:
//! returning [`HandlerError::Checkpoint`] from a phase handler is the
//! sanctioned way to request suspension and continuation, while every other
//! variant is a terminal failure reported back to CloudFormation.

use serde_json::Value;
use thiserror::Error;

use crate::event::ResourcePhase;

/// The main error type for custom resource handlers and SDK internals.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Checkpoint signal raised by a handler to request a continuation.
    ///
    /// This is not a failure: the router captures the state payload, spawns
    /// a fresh execution carrying it, and ends the current one without
    /// reporting anything to CloudFormation.
    #[error("execution checkpoint requested")]
    Checkpoint {
        /// Opaque state payload handed to the next execution unchanged.
        state: Value,
    },

    /// The session wall-clock budget was exhausted.
    #[error("The custom resource operation failed to complete within the user specified timeout of {timeout_secs} seconds")]
    SessionTimeout {
        /// The configured total budget for the session.
        timeout_secs: u64,
    },

    /// A secret reference token could not be resolved.
    ///
    /// Always fatal: an unresolved token must never pass through to the
    /// handler as a literal string.
    #[error("Failed to resolve secret reference '{reference}': {message}")]
    SecretResolution {
        /// The reference token as it appeared in the resource properties
        reference: String,
        /// Description of the resolution failure
        message: String,
    },

    /// No handler was registered for the resolved phase.
    #[error("No handler registered for request type {phase}")]
    UnregisteredPhase {
        /// The phase that had no registered handler
        phase: ResourcePhase,
    },

    /// A user handler failed with an ordinary error.
    #[error("{message}")]
    Resource {
        /// Error message from the handler
        message: String,
    },

    /// Submitting the continuation invocation failed.
    ///
    /// Terminal: without a pending execution the session would stall
    /// silently, so the router reports this failure instead of continuing.
    #[error("Failed to invoke continuation execution: {message}")]
    ContinuationFailed {
        /// Description of the submission failure
        message: String,
    },

    /// Delivering the terminal response to CloudFormation failed.
    #[error("Callback delivery failed: {message}")]
    Callback {
        /// Description of the delivery failure
        message: String,
    },

    /// Stack status lookup failed.
    ///
    /// Never fatal to provisioning; the router degrades the status fields
    /// to `"UNKNOWN"` and proceeds.
    #[error("Stack status lookup failed: {message}")]
    StatusLookup {
        /// Description of the lookup failure
        message: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },
}

impl HandlerError {
    /// Creates a checkpoint signal carrying the given state payload.
    pub fn checkpoint(state: impl Into<Value>) -> Self {
        Self::Checkpoint {
            state: state.into(),
        }
    }

    /// Creates a session-timeout error for the given budget.
    pub fn session_timeout(timeout_secs: u64) -> Self {
        Self::SessionTimeout { timeout_secs }
    }

    /// Creates a secret-resolution error.
    pub fn secret_resolution(
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SecretResolution {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Creates a resource error from a handler failure message.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource {
            message: message.into(),
        }
    }

    /// Creates a continuation-submission error.
    pub fn continuation(message: impl Into<String>) -> Self {
        Self::ContinuationFailed {
            message: message.into(),
        }
    }

    /// Creates a callback-delivery error.
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }

    /// Creates a stack-status lookup error.
    pub fn status_lookup(message: impl Into<String>) -> Self {
        Self::StatusLookup {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if this is a checkpoint signal rather than a failure.
    pub fn is_checkpoint(&self) -> bool {
        matches!(self, Self::Checkpoint { .. })
    }

    /// Returns true if this is a session-timeout failure.
    pub fn is_session_timeout(&self) -> bool {
        matches!(self, Self::SessionTimeout { .. })
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for HandlerError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Resource {
            message: error.to_string(),
        }
    }
}
