//! Wire record types for activity logs and constraint batches
//!
//! These are the untyped shapes the engine consumes: a 6-field activity
//! record per log line and a 9-field constraint record per administrator
//! rule. External collaborators ship batches of them as JSON arrays; field
//! order in the positional constructors is normative.

use serde::{Deserialize, Serialize};

// ============================================================================
// ACTIVITY RECORDS
// ============================================================================

/// One raw audit-log line, prior to normalization.
///
/// Fields, in positional order:
/// 0. `activity_time` - `YYYY-MM-DDTHH:MM:SS[.ffffff]Z`
/// 1. `action` - raw action grammar (`Edit`, `Move:<src>:<dst>`, ...)
/// 2. `document_id`
/// 3. `document_name` - advisory
/// 4. `actor_id` - advisory
/// 5. `actor_name` - the actor used by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivityRecord {
    pub activity_time: String,
    pub action: String,
    pub document_id: String,
    pub document_name: String,
    pub actor_id: String,
    pub actor_name: String,
}

impl RawActivityRecord {
    /// Create a new activity record.
    pub fn new(
        activity_time: impl Into<String>,
        action: impl Into<String>,
        document_id: impl Into<String>,
        document_name: impl Into<String>,
        actor_id: impl Into<String>,
        actor_name: impl Into<String>,
    ) -> Self {
        Self {
            activity_time: activity_time.into(),
            action: action.into(),
            document_id: document_id.into(),
            document_name: document_name.into(),
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
        }
    }
}

impl From<[String; 6]> for RawActivityRecord {
    fn from(fields: [String; 6]) -> Self {
        let [activity_time, action, document_id, document_name, actor_id, actor_name] = fields;
        Self {
            activity_time,
            action,
            document_id,
            document_name,
            actor_id,
            actor_name,
        }
    }
}

// ============================================================================
// CONSTRAINT RECORDS
// ============================================================================

/// One raw administrator rule, prior to parsing.
///
/// Fields, in positional order:
/// 0. `document_names` - advisory
/// 1. `document_ids` - indexed
/// 2. `action` - administrative category, advisory
/// 3. `action_type` - canonical action kind, indexed
/// 4. `actor_ids` - indexed
/// 5. `legacy_flag` - ignored
/// 6. `comparator` - `""` / `in` / `not in` / `gt` / `lt`
/// 7. `owner` - advisory
/// 8. `allowed_values` - indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConstraintRecord {
    pub document_names: Vec<String>,
    pub document_ids: Vec<String>,
    pub action: String,
    pub action_type: String,
    pub actor_ids: Vec<String>,
    pub legacy_flag: String,
    pub comparator: String,
    pub owner: String,
    pub allowed_values: Vec<String>,
}

impl RawConstraintRecord {
    /// Create a constraint record from its indexed fields; advisory fields
    /// start empty.
    pub fn new(
        document_ids: Vec<String>,
        action_type: impl Into<String>,
        actor_ids: Vec<String>,
        comparator: impl Into<String>,
        allowed_values: Vec<String>,
    ) -> Self {
        Self {
            document_names: Vec::new(),
            document_ids,
            action: String::new(),
            action_type: action_type.into(),
            actor_ids,
            legacy_flag: String::new(),
            comparator: comparator.into(),
            owner: String::new(),
            allowed_values,
        }
    }

    /// Set the advisory document names.
    pub fn with_document_names(mut self, names: Vec<String>) -> Self {
        self.document_names = names;
        self
    }

    /// Set the advisory administrative category.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the advisory owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }
}
