//! Parsed constraint types
//!
//! A [`Constraint`] is one administrator rule after validation: the sets it
//! covers, the canonical action kind, and the value condition its matches
//! must satisfy. A single constraint over k documents and m actors behaves
//! identically to its k x m single-element Cartesian expansion.

use crate::{ActionKind, Comparator, Timestamp};
use serde::{Deserialize, Serialize};

/// Allowed-value operands of a condition, typed after normalization.
///
/// Edit constraints with a comparator parse their operands to instants at
/// ingest so the evaluator compares timestamps, never strings. Everything
/// else keeps string operands (permission-change target users).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionValues {
    /// Target-user identifiers.
    Users(Vec<String>),
    /// Edit-time operands.
    Instants(Vec<Timestamp>),
}

impl ConditionValues {
    /// Number of operands.
    pub fn len(&self) -> usize {
        match self {
            ConditionValues::Users(values) => values.len(),
            ConditionValues::Instants(values) => values.len(),
        }
    }

    /// Whether there are no operands.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One value condition: a comparator joined to its operands.
///
/// `comparator == None` is the unconditional form, which matches every event
/// that reaches its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub comparator: Option<Comparator>,
    pub values: ConditionValues,
}

impl Condition {
    /// Create a condition.
    pub fn new(comparator: Option<Comparator>, values: ConditionValues) -> Self {
        Self { comparator, values }
    }

    /// Create the unconditional condition.
    pub fn unconditional() -> Self {
        Self {
            comparator: None,
            values: ConditionValues::Users(Vec::new()),
        }
    }
}

/// A single administrator rule, parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Documents this rule covers. Never empty.
    pub document_ids: Vec<String>,
    /// Canonical action kind. Legacy aliases are resolved before this point.
    pub action_kind: ActionKind,
    /// Actors this rule restricts. Never empty.
    pub actor_ids: Vec<String>,
    /// Value condition applied to matching events.
    pub condition: Condition,
    /// Advisory metadata; not used by evaluation.
    pub owner: Option<String>,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(
        document_ids: Vec<String>,
        action_kind: ActionKind,
        actor_ids: Vec<String>,
        condition: Condition,
    ) -> Self {
        Self {
            document_ids,
            action_kind,
            actor_ids,
            condition,
            owner: None,
        }
    }

    /// Set the advisory owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Number of index cells this constraint occupies (documents x actors).
    pub fn cell_count(&self) -> usize {
        self.document_ids.len() * self.actor_ids.len()
    }
}
