//! Error types for nodelet-zenoh.

use std::time::Duration;
use thiserror::Error;

/// Result type for nodelet-zenoh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nodelet-zenoh.
#[derive(Debug, Error)]
pub enum Error {
    /// Zenoh session error
    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    /// CDR serialization error
    #[error("CDR serialization error: {0}")]
    Cdr(String),

    /// Invalid name (topic, node, namespace)
    #[error("Invalid name: {0}")]
    InvalidName(#[from] nodelet_args::ArgsError),

    /// No server advertised the service within the wait deadline
    #[error("service {service} unavailable after waiting {waited:?}")]
    ServiceUnavailable {
        /// Fully qualified service name.
        service: String,
        /// How long the caller waited before giving up.
        waited: Duration,
    },

    /// The server replied with an error instead of a response payload
    #[error("service replied with an error: {0}")]
    ServiceError(String),

    /// Timeout waiting for response
    #[error("Timeout")]
    Timeout,

    /// Response is missing the rmw_zenoh attachment
    #[error("response missing attachment")]
    MissingAttachment,

    /// Attachment bytes are malformed
    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
