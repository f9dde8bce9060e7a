//! Enum types for ACCORD events and constraints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ACTION KINDS
// ============================================================================

/// Canonical category of a logged action, used as an index key.
///
/// Wire strings are the spaced forms found in activity logs and constraint
/// records (`"Can Create"`, `"Add Permission"`, ...). The legacy alias
/// `"Time Limit Edit"` is accepted on parse and canonicalized to [`CanEdit`];
/// it is never emitted.
///
/// [`CanEdit`]: ActionKind::CanEdit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "Can Create")]
    CanCreate,
    #[serde(rename = "Can Delete")]
    CanDelete,
    #[serde(rename = "Can Edit", alias = "Time Limit Edit")]
    CanEdit,
    #[serde(rename = "Can Move")]
    CanMove,
    #[serde(rename = "Can Rename")]
    CanRename,
    #[serde(rename = "Add Permission")]
    AddPermission,
    #[serde(rename = "Remove Permission")]
    RemovePermission,
    #[serde(rename = "Update Permission")]
    UpdatePermission,
}

impl ActionKind {
    /// Convert to the canonical wire string.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            ActionKind::CanCreate => "Can Create",
            ActionKind::CanDelete => "Can Delete",
            ActionKind::CanEdit => "Can Edit",
            ActionKind::CanMove => "Can Move",
            ActionKind::CanRename => "Can Rename",
            ActionKind::AddPermission => "Add Permission",
            ActionKind::RemovePermission => "Remove Permission",
            ActionKind::UpdatePermission => "Update Permission",
        }
    }

    /// Parse from a wire string, accepting the legacy alias.
    pub fn from_wire_str(s: &str) -> Result<Self, ActionKindParseError> {
        match s {
            "Can Create" => Ok(ActionKind::CanCreate),
            "Can Delete" => Ok(ActionKind::CanDelete),
            "Can Edit" => Ok(ActionKind::CanEdit),
            "Can Move" => Ok(ActionKind::CanMove),
            "Can Rename" => Ok(ActionKind::CanRename),
            "Add Permission" => Ok(ActionKind::AddPermission),
            "Remove Permission" => Ok(ActionKind::RemovePermission),
            "Update Permission" => Ok(ActionKind::UpdatePermission),
            // Stored constraints predating the permission-kind split
            "Time Limit Edit" => Ok(ActionKind::CanEdit),
            _ => Err(ActionKindParseError(s.to_string())),
        }
    }

    /// Whether events of this kind carry an edit timestamp as their value.
    pub fn is_edit(&self) -> bool {
        matches!(self, ActionKind::CanEdit)
    }

    /// Whether events of this kind carry a permission target as their value.
    pub fn is_permission_change(&self) -> bool {
        matches!(
            self,
            ActionKind::AddPermission
                | ActionKind::RemovePermission
                | ActionKind::UpdatePermission
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for ActionKind {
    type Err = ActionKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_str(s)
    }
}

/// Error when parsing an invalid action kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionKindParseError(pub String);

impl fmt::Display for ActionKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid action kind: {}", self.0)
    }
}

impl std::error::Error for ActionKindParseError {}

// ============================================================================
// COMPARATORS
// ============================================================================

/// Operator joining an event's value to a constraint's allowed-value set.
///
/// The unconditional form (a constraint that flags every matching
/// document/action/actor triple) is represented as `Option<Comparator>::None`;
/// its wire encoding is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
}

impl Comparator {
    /// Convert to the wire string.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Comparator::In => "in",
            Comparator::NotIn => "not in",
            Comparator::GreaterThan => "gt",
            Comparator::LessThan => "lt",
        }
    }

    /// Parse from a wire string.
    pub fn from_wire_str(s: &str) -> Result<Self, ComparatorParseError> {
        match s {
            "in" => Ok(Comparator::In),
            "not in" => Ok(Comparator::NotIn),
            "gt" => Ok(Comparator::GreaterThan),
            "lt" => Ok(Comparator::LessThan),
            _ => Err(ComparatorParseError(s.to_string())),
        }
    }

    /// Whether this comparator orders values rather than testing membership.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Comparator::GreaterThan | Comparator::LessThan)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for Comparator {
    type Err = ComparatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_str(s)
    }
}

/// Error when parsing an invalid comparator string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparatorParseError(pub String);

impl fmt::Display for ComparatorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid comparator: {}", self.0)
    }
}

impl std::error::Error for ComparatorParseError {}

// ============================================================================
// BUILD MODE
// ============================================================================

/// Failure policy when building an engine from a constraint batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildMode {
    /// A malformed constraint fails the batch atomically; no partial index
    /// is retained.
    Strict,
    /// A malformed constraint is dropped with a warning and the build
    /// continues.
    #[default]
    Lenient,
}
