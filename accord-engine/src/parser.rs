//! Constraint parsing
//!
//! Validates one raw 9-field constraint record and decomposes it into the
//! indexable [`Constraint`] form. The legacy `Time Limit Edit` kind is
//! canonicalized to `Can Edit` here; nothing downstream ever sees the alias.

use accord_core::{
    ActionKind, ActionKindParseError, Comparator, Condition, ConditionValues, Constraint,
    ConstraintError, RawConstraintRecord,
};

use crate::normalizer::parse_rfc3339;

/// Operand entries with no meaning: blanks and the `-` placeholder the
/// administrative UI writes for "no value".
fn is_operand_sentinel(value: &str) -> bool {
    value.is_empty() || value == "-"
}

/// Parse and validate a raw constraint record.
///
/// # Errors
///
/// Returns a [`ConstraintError`] when the action kind or comparator is
/// unknown, the document or actor set is empty, or an edit constraint with a
/// comparator carries an operand that does not parse as a timestamp.
pub fn parse_constraint(record: &RawConstraintRecord) -> Result<Constraint, ConstraintError> {
    let action_kind = record
        .action_type
        .parse()
        .map_err(|e: ActionKindParseError| ConstraintError::UnknownActionKind { value: e.0 })?;

    let comparator = if record.comparator.is_empty() {
        None
    } else {
        Some(record.comparator.parse::<Comparator>().map_err(|e| {
            ConstraintError::InvalidComparator { value: e.0 }
        })?)
    };

    let document_ids: Vec<String> = record
        .document_ids
        .iter()
        .filter(|id| !id.is_empty())
        .cloned()
        .collect();
    if document_ids.is_empty() {
        return Err(ConstraintError::EmptyDocumentSet);
    }

    let actor_ids: Vec<String> = record
        .actor_ids
        .iter()
        .filter(|id| !id.is_empty())
        .cloned()
        .collect();
    if actor_ids.is_empty() {
        return Err(ConstraintError::EmptyActorSet);
    }

    let operands: Vec<&String> = record
        .allowed_values
        .iter()
        .filter(|v| !is_operand_sentinel(v))
        .collect();

    // Edit constraints with a comparator compare against instants, so their
    // operands are parsed once here rather than per event.
    let values = if comparator.is_some() && action_kind == ActionKind::CanEdit {
        let instants = operands
            .iter()
            .map(|v| {
                parse_rfc3339(v).map_err(|e| ConstraintError::InvalidAllowedValue {
                    value: v.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        ConditionValues::Instants(instants)
    } else {
        ConditionValues::Users(operands.into_iter().cloned().collect())
    };

    let mut constraint = Constraint::new(
        document_ids,
        action_kind,
        actor_ids,
        Condition::new(comparator, values),
    );
    if !record.owner.is_empty() {
        constraint = constraint.with_owner(record.owner.clone());
    }

    Ok(constraint)
}
