use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::fingerprint::fingerprint;

/// A persisted raw dataset item plus its dedup fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawRecord {
    pub id: Uuid,
    pub channel: String,
    pub raw_content: Value,
    pub hash_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A raw record before the store assigns identity and timestamps.
///
/// The fingerprint is always derived from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRawRecord {
    channel: String,
    raw_content: Value,
    hash_content: String,
}

impl NewRawRecord {
    pub fn new(channel: impl Into<String>, raw_content: Value) -> Self {
        let hash_content = fingerprint(&raw_content);
        Self {
            channel: channel.into(),
            raw_content,
            hash_content,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn raw_content(&self) -> &Value {
        &self.raw_content
    }

    pub fn hash_content(&self) -> &str {
        &self.hash_content
    }

    /// Checks every store runs before touching its backend.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.channel.trim().is_empty() {
            return Err(PipelineError::InvalidArgument(
                "channel cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
