//! Trigger event loading.
//!
//! The workflow runner writes the triggering webhook payload to a file and
//! exports its path; only `issue.body` is consulted here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::posts::domain::EMPTY_PAYLOAD;
use crate::posts::errors::IngestError;

#[derive(Debug, Default, Deserialize)]
pub struct TriggerEvent {
    #[serde(default)]
    pub issue: Option<Issue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub body: Option<String>,
}

impl TriggerEvent {
    pub async fn load(path: &Path) -> Result<Self, IngestError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| IngestError::EventRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let event = Self::from_slice(&bytes)?;
        debug!(path = %path.display(), issue = ?event.issue.as_ref().and_then(|i| i.number), "event loaded");
        Ok(event)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, IngestError> {
        serde_json::from_slice(bytes).map_err(|e| IngestError::EventParse(e.to_string()))
    }

    /// The issue body text; `{}` when the issue or its body is absent.
    pub fn issue_body(&self) -> &str {
        self.issue
            .as_ref()
            .and_then(|issue| issue.body.as_deref())
            .unwrap_or(EMPTY_PAYLOAD)
    }
}

/// Pick the event file: an explicit path wins, otherwise the value of the
/// environment variable `var` as returned by `lookup`. Unset and empty are
/// both errors.
pub fn resolve_event_path<F>(explicit: Option<PathBuf>, var: &str, lookup: F) -> Result<PathBuf, IngestError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Ok(path);
    }
    lookup(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| IngestError::MissingEventPath(var.to_string()))
}
