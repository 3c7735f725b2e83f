//! Engine error taxonomy and the host-facing reply shape.

use serde::{Deserialize, Serialize};

use crate::persist::PersistError;

/// Failure of an engine operation.
#[derive(Debug, thiserror::Error)]
pub enum RsvpError {
    /// A required field is missing or empty. Raised before any write.
    #[error("validation error: {0}")]
    Validation(String),
    /// A referenced store, column or row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The store adapter failed on a step that cannot be skipped.
    #[error("store i/o error: {0}")]
    StoreIo(#[from] PersistError),
}

/// Result alias for engine operations.
pub type RsvpResult<T> = Result<T, RsvpError>;

/// Reply status understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Operation committed.
    Success,
    /// Operation failed; nothing past the failing step was written.
    Error,
}

/// Structured `{status, message}` reply returned to the host instead of a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome class.
    pub status: ResponseStatus,
    /// Human-readable message.
    pub message: String,
}

impl Response {
    /// Success reply.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    /// Error reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }

    /// True for [`ResponseStatus::Success`].
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl From<&RsvpError> for Response {
    fn from(err: &RsvpError) -> Self {
        Self::error(format!("There was a problem saving your RSVP: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_lowercase_status() {
        let json = serde_json::to_value(Response::error("boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }
}
