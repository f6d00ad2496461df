//! Error types for the Vultr API client.

use crate::backend::BackendError;
use thiserror::Error;

/// Errors raised by the Vultr API client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum VultrApiError {
    /// Raised when a spec is missing a required field.
    #[error("invalid instance spec: {0}")]
    Validation(String),
    /// Raised when the request body cannot be encoded. Nothing is sent to
    /// the provider in this case.
    #[error("failed to encode request body: {0}")]
    RequestBuild(String),
    /// Raised when the provider cannot be reached at the network level.
    #[error("transport failure talking to the API: {0}")]
    Transport(String),
    /// Raised on HTTP 401. Retrying without remediation cannot succeed:
    /// the usual cause is that this machine's address is not on the API
    /// token's allow-list.
    #[error(
        "API rejected the token (HTTP 401); check that this machine's IP address \
         is allow-listed for the token in the provider's access control settings"
    )]
    Unauthorized,
    /// Raised when the provider answers with an unexpected status code.
    #[error("unexpected response status {got} (expected {expected}): {body}")]
    UnexpectedStatus {
        /// Status code observed on the wire.
        got: u16,
        /// Status code the operation expected.
        expected: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// Raised when the response body does not parse as the expected schema.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl From<BackendError> for VultrApiError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Validation(field) => Self::Validation(field),
        }
    }
}
