//! Error taxonomy
//!
//! Two severities only: a [`NonRecoverable`](Error::NonRecoverable) error is a
//! caller or configuration defect that no amount of retrying will fix, while a
//! [`Recoverable`](Error::Recoverable) error models "not there yet" conditions
//! the host runtime may retry on a later scheduling pass. Transport and JSON
//! failures pass through unmodified.

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server rejected the payload or the caller misused the API.
    /// Retrying will not help; surfaced to the operator as a config defect.
    #[error("{0}")]
    NonRecoverable(String),

    /// The resource may not exist yet, or the server answered with an
    /// unexpected status. Safe to retry on a later pass.
    #[error("{0}")]
    Recoverable(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Unexpected-status error embedding both the expected and actual codes.
    pub fn unexpected_status(expected: StatusCode, actual: StatusCode) -> Self {
        Error::Recoverable(format!(
            "expected HTTP status code {}, received {}",
            expected.as_u16(),
            actual.as_u16()
        ))
    }

    /// Whether a retry-later policy is appropriate for this error.
    ///
    /// Transport failures count as recoverable: the original request may
    /// simply not have reached the service.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::NonRecoverable(_))
    }
}
