use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::IngestError;

/// Issue body used when the trigger carries none.
pub const EMPTY_PAYLOAD: &str = "{}";

/// Post created by this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub trip_key: String,
    pub body: String,
}

impl Post {
    /// Build a fresh post from a validated request: new v4 id, current UTC time.
    pub fn from_request(request: PostRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: request.user_id,
            trip_key: request.trip_key,
            body: request.body,
        }
    }
}

/// A record as found in the store, kept exactly as read.
///
/// Older writers stored whatever JSON the issue carried (numeric bodies,
/// no `trip_key`, extra fields), so only `user_id` and `trip_key` are ever
/// interpreted and the rest round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredPost(Value);

impl StoredPost {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// String `user_id`, if the record has one.
    pub fn user_id(&self) -> Option<&str> {
        self.0.get("user_id").and_then(Value::as_str)
    }

    /// String `trip_key`, if the record has one.
    pub fn trip_key(&self) -> Option<&str> {
        self.0.get("trip_key").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl TryFrom<&Post> for StoredPost {
    type Error = serde_json::Error;

    fn try_from(post: &Post) -> Result<Self, Self::Error> {
        serde_json::to_value(post).map(Self)
    }
}

/// Wire shape of the JSON carried in the issue body.
#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    trip_key: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Validated post submission.
#[derive(Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub user_id: String,
    pub trip_key: String,
    pub body: String,
}

impl PostRequest {
    /// Parse and validate the JSON text of an issue body.
    ///
    /// `user_id` and `trip_key` must be non-empty; `body` must be present but
    /// may be empty.
    pub fn from_issue_body(raw: &str) -> Result<Self, IngestError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| IngestError::MalformedPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(IngestError::MalformedPayload("expected a JSON object".into()));
        }
        let payload: RawPayload =
            serde_json::from_value(value).map_err(|e| IngestError::MalformedPayload(e.to_string()))?;

        let user_id = payload.user_id.filter(|s| !s.is_empty());
        let trip_key = payload.trip_key.filter(|s| !s.is_empty());

        match (user_id, trip_key, payload.body) {
            (Some(user_id), Some(trip_key), Some(body)) => Ok(Self { user_id, trip_key, body }),
            (user_id, trip_key, body) => {
                let mut missing = Vec::new();
                if user_id.is_none() { missing.push("user_id"); }
                if trip_key.is_none() { missing.push("trip_key"); }
                if body.is_none() { missing.push("body"); }
                Err(IngestError::MissingFields(missing))
            }
        }
    }
}

impl fmt::Debug for PostRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRequest")
            .field("user_id", &self.user_id)
            .field("trip_key", &"<redacted>")
            .field("body_len", &self.body.len())
            .finish()
    }
}
