use thiserror::Error;

use crate::errors::ServiceError;

/// Terminal failures of one ingest invocation.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0} is not set")]
    MissingEventPath(String),
    #[error("failed to read event file {path}: {reason}")]
    EventRead { path: String, reason: String },
    #[error("event file is not valid JSON: {0}")]
    EventParse(String),
    #[error("issue body is not valid JSON: {0}")]
    MalformedPayload(String),
    #[error("missing required fields ({}) in issue body", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("trip key does not match the one registered for user_id `{user_id}`")]
    TripKeyMismatch { user_id: String },
    #[error("failed to save posts: {0}")]
    Storage(#[from] ServiceError),
}

impl IngestError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            IngestError::MissingEventPath(_) => 2001,
            IngestError::EventRead { .. } => 2002,
            IngestError::EventParse(_) => 2003,
            IngestError::MalformedPayload(_) => 2101,
            IngestError::MissingFields(_) => 2102,
            IngestError::TripKeyMismatch { .. } => 2201,
            IngestError::Storage(_) => 2300,
        }
    }
}
