//! Outbound record notifications for blog mutations.
//!
//! Every successful write publishes an event to an external records
//! endpoint. The call is best-effort: it happens strictly after the store
//! mutation and its failure never rolls the mutation back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Create,
    Delete,
}

/// Wire payload for the records endpoint: the event kind plus the mutated
/// row, pre-serialized as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEvent {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordReceipt {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The endpoint answered with a non-success status. Carries the upstream
    /// status and body rather than being thrown, so callers can decide
    /// whether the failure matters.
    #[error("records endpoint answered {status}: {message}")]
    Upstream { status: u16, message: String },
    /// No usable response at all (connect failure, timeout, bad body).
    #[error("records request failed: {message}")]
    Transport { message: String },
}

#[async_trait]
pub trait RecordsNotifier: Send + Sync {
    async fn put_record(&self, event: &RecordEvent) -> Result<RecordReceipt, NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_event_serializes_to_wire_shape() {
        let event = RecordEvent {
            kind: RecordKind::Create,
            data: "{\"id\":\"abc\"}".to_string(),
        };
        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["type"], "CREATE");
        assert_eq!(json["data"], "{\"id\":\"abc\"}");
    }

    #[test]
    fn delete_kind_uses_uppercase_tag() {
        let json = serde_json::to_value(RecordKind::Delete).expect("kind serializes");
        assert_eq!(json, "DELETE");
    }

    #[test]
    fn receipt_tolerates_missing_message() {
        let receipt: RecordReceipt =
            serde_json::from_str("{\"id\":\"r-1\"}").expect("receipt parses");
        assert_eq!(receipt.id, "r-1");
        assert!(receipt.message.is_none());
    }
}
