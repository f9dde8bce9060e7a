//! Event normalization
//!
//! Turns one raw 6-field activity record into a typed [`Event`], dispatching
//! on the raw action grammar:
//!
//! - `Permission Change-to:<new>-from:<old>-for:<target>` - permission change
//! - `Move:<src>:<dst>` - move
//! - `Edit` - edit, value is the activity time
//! - `Create` / `Delete` / `Rename` - valueless
//!
//! Anything else is a malformed event. The normalizer never coerces missing
//! fields; the engine classifies records it rejects as non-conflicts.

use accord_core::{ActionKind, Event, EventError, EventValue, RawActivityRecord, Timestamp};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Permission-change grammar. Segments are `-`-free; colons inside the
/// permission lists and the target survive intact.
static PERMISSION_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Permission Change-to:([^-]+)-from:([^-]+)-for:([^-]+)$")
        .expect("permission change pattern is valid")
});

/// Move grammar: source and destination folder, colon-separated.
static MOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Move:([^:]+):([^:]+)$").expect("move pattern is valid"));

/// Parse a timestamp in the log format (`YYYY-MM-DDTHH:MM:SS[.ffffff]Z`).
pub(crate) fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.with_timezone(&Utc))
}

/// Parse an activity timestamp, mapping failure to a normalization error.
fn parse_instant(value: &str) -> Result<Timestamp, EventError> {
    parse_rfc3339(value).map_err(|e| EventError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Normalize a raw activity record into a typed event.
///
/// # Errors
///
/// Returns an [`EventError`] when a mandatory field is empty, the activity
/// time does not parse, or the raw action fits none of the supported
/// grammars.
pub fn normalize(record: &RawActivityRecord) -> Result<Event, EventError> {
    if record.activity_time.is_empty() {
        return Err(EventError::MissingField {
            field: "activity_time",
        });
    }
    if record.action.is_empty() {
        return Err(EventError::MissingField { field: "action" });
    }
    if record.document_id.is_empty() {
        return Err(EventError::MissingField {
            field: "document_id",
        });
    }
    if record.actor_name.is_empty() {
        return Err(EventError::MissingField {
            field: "actor_name",
        });
    }

    let timestamp = parse_instant(&record.activity_time)?;

    // Dispatch on the action prefix, mirroring the grammar families.
    if record.action.starts_with("Per") {
        return normalize_permission_change(record, timestamp);
    }
    if record.action.starts_with("Mov") {
        if !MOVE.is_match(&record.action) {
            return Err(EventError::MalformedMove {
                action: record.action.clone(),
            });
        }
        return Ok(Event::new(
            &record.document_id,
            ActionKind::CanMove,
            &record.actor_name,
            timestamp,
        ));
    }
    if record.action.starts_with("Edi") {
        return Ok(Event::new(
            &record.document_id,
            ActionKind::CanEdit,
            &record.actor_name,
            timestamp,
        )
        .with_value(EventValue::Instant(timestamp)));
    }

    let kind = match record.action.as_str() {
        "Create" => ActionKind::CanCreate,
        "Delete" => ActionKind::CanDelete,
        "Rename" => ActionKind::CanRename,
        _ => {
            return Err(EventError::UnsupportedAction {
                action: record.action.clone(),
            })
        }
    };

    Ok(Event::new(
        &record.document_id,
        kind,
        &record.actor_name,
        timestamp,
    ))
}

/// Split a permission-change action and derive its kind.
///
/// `to:none` means every permission was removed; `from:none` means the target
/// had none before. Everything else is an update.
fn normalize_permission_change(
    record: &RawActivityRecord,
    timestamp: Timestamp,
) -> Result<Event, EventError> {
    let captures =
        PERMISSION_CHANGE
            .captures(&record.action)
            .ok_or_else(|| EventError::MalformedPermissionChange {
                action: record.action.clone(),
            })?;

    let new_permissions = &captures[1];
    let old_permissions = &captures[2];
    let target = &captures[3];

    let kind = if new_permissions == "none" {
        ActionKind::RemovePermission
    } else if old_permissions == "none" {
        ActionKind::AddPermission
    } else {
        ActionKind::UpdatePermission
    };

    Ok(Event::new(
        &record.document_id,
        kind,
        &record.actor_name,
        timestamp,
    )
    .with_value(EventValue::User(target.to_string())))
}
