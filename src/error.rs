//! Error types for the OSD environment materializer
//!
//! The materializer itself has a single failure mode (drive group
//! serialization). The remaining variants belong to the loading layer
//! used by the binary.

use thiserror::Error;

/// Unified error type for the materializer
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Materialization Errors
    // =========================================================================
    #[error("failed to marshal drive groups into an environment entry: {source}")]
    DriveGroupMarshal {
        #[source]
        source: Box<Error>,
    },

    // =========================================================================
    // Blob Serialization Errors
    // =========================================================================
    #[error("Drive group blob serialization failed: {0}")]
    BlobSerialization(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Action a caller should take when an operation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Requeue with exponential backoff
    RequeueWithBackoff,
    /// Don't requeue, wait for the input to change
    NoRequeue,
}

impl Error {
    /// Wrap a serializer failure as a failed materialization step
    pub fn drive_group_marshal(source: Error) -> Self {
        Error::DriveGroupMarshal {
            source: Box::new(source),
        }
    }

    /// Determine what action to take for this error
    pub fn action(&self) -> ErrorAction {
        match self {
            // Deterministic in the input - retrying the same input is pointless
            Error::DriveGroupMarshal { .. }
            | Error::BlobSerialization(_)
            | Error::Configuration(_)
            | Error::JsonParse(_)
            | Error::YamlParse(_) => ErrorAction::NoRequeue,

            Error::Io(_) => ErrorAction::RequeueWithBackoff,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        !matches!(self.action(), ErrorAction::NoRequeue)
    }
}

/// Result type alias for the materializer
pub type Result<T> = std::result::Result<T, Error>;
