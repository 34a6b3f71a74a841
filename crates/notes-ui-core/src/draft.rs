//! The local draft slot.
//!
//! A single record under a fixed key. Writes replace the whole record;
//! absence of the key is the normal "no draft" state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Snapshot of an in-progress, unsaved note edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub title: String,
    pub content: String,
    /// When the snapshot was taken, stored as ISO-8601 with milliseconds.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl DraftRecord {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp,
        }
    }

    /// Snapshot the given field values at the current time.
    pub fn capture(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(title, content, Utc::now())
    }

    pub fn to_json(&self) -> Result<String, DraftError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DraftError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Storage for the single draft record.
pub trait DraftStore: 'static {
    /// Read the record. `Ok(None)` means there is no draft.
    fn load(&self) -> Result<Option<DraftRecord>, DraftError>;

    /// Replace the record.
    fn save(&self, record: &DraftRecord) -> Result<(), DraftError>;

    /// Delete the record if present.
    fn clear(&self);
}

/// Serialize timestamps the way `Date.prototype.toISOString` does.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
