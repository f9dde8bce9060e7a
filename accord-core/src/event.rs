//! Normalized event types
//!
//! An [`Event`] is the typed form of one audit record, produced by the
//! normalizer once per log line and read-only thereafter.

use crate::ActionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout ACCORD.
pub type Timestamp = DateTime<Utc>;

/// The variable payload of an event.
///
/// Edits carry their activity time; permission changes carry the target
/// user. Create, delete, move, and rename events carry no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventValue {
    /// Target user of a permission change.
    User(String),
    /// Activity time of an edit.
    Instant(Timestamp),
}

/// The normalized form of one audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Document the action targeted.
    pub document_id: String,
    /// Canonical action kind.
    pub action_kind: ActionKind,
    /// Identity that performed the action.
    pub actor: String,
    /// Variable payload, when the kind carries one.
    pub value: Option<EventValue>,
    /// When the event occurred. Authoritative for edits, advisory otherwise.
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a valueless event.
    pub fn new(
        document_id: impl Into<String>,
        action_kind: ActionKind,
        actor: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            action_kind,
            actor: actor.into(),
            value: None,
            timestamp,
        }
    }

    /// Set the variable payload.
    pub fn with_value(mut self, value: EventValue) -> Self {
        self.value = Some(value);
        self
    }
}
