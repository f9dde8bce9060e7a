//! ACCORD Test Utilities
//!
//! Centralized test infrastructure for the ACCORD workspace:
//! - Proptest generators for activity and constraint records
//! - Fixture builders for common log shapes
//! - A naive reference classifier for differential testing

// Re-export core types for convenience
pub use accord_core::{
    ActionKind, BuildMode, Comparator, Condition, ConditionValues, Constraint, EngineConfig,
    Event, EventValue, RawActivityRecord, RawConstraintRecord, Timestamp,
};

use accord_engine::{condition_matches, normalize, parse_constraint};
use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

/// Parse a timestamp literal, panicking on bad test input.
pub fn timestamp(value: &str) -> Timestamp {
    value.parse().unwrap_or_else(|e| panic!("bad timestamp literal '{value}': {e}"))
}

/// An activity record with the given raw action; advisory fields filled with
/// placeholders.
pub fn activity(time: &str, action: &str, document_id: &str, actor: &str) -> RawActivityRecord {
    RawActivityRecord::new(time, action, document_id, "Untitled", "uid-0", actor)
}

/// An edit activity.
pub fn edit_activity(time: &str, document_id: &str, actor: &str) -> RawActivityRecord {
    activity(time, "Edit", document_id, actor)
}

/// A permission-change activity. `new` and `old` are `/`-joined permission
/// lists or `none`.
pub fn permission_change_activity(
    time: &str,
    document_id: &str,
    actor: &str,
    new: &str,
    old: &str,
    target: &str,
) -> RawActivityRecord {
    activity(
        time,
        &format!("Permission Change-to:{new}-from:{old}-for:{target}"),
        document_id,
        actor,
    )
}

/// A move activity.
pub fn move_activity(
    time: &str,
    document_id: &str,
    actor: &str,
    src: &str,
    dst: &str,
) -> RawActivityRecord {
    activity(time, &format!("Move:{src}:{dst}"), document_id, actor)
}

/// A constraint record over single documents/actors with the given
/// comparator wire string.
pub fn constraint(
    document_ids: &[&str],
    action_type: &str,
    actor_ids: &[&str],
    comparator: &str,
    allowed_values: &[&str],
) -> RawConstraintRecord {
    RawConstraintRecord::new(
        document_ids.iter().map(|v| v.to_string()).collect(),
        action_type,
        actor_ids.iter().map(|v| v.to_string()).collect(),
        comparator,
        allowed_values.iter().map(|v| v.to_string()).collect(),
    )
}

// ============================================================================
// REFERENCE CLASSIFIER
// ============================================================================

/// Whether a single parsed constraint applies to an event: document, kind,
/// and actor all covered, and the condition satisfied.
pub fn constraint_applies(constraint: &Constraint, event: &Event) -> bool {
    constraint
        .document_ids
        .iter()
        .any(|d| *d == event.document_id)
        && constraint.action_kind == event.action_kind
        && constraint.actor_ids.iter().any(|a| *a == event.actor)
        && condition_matches(&constraint.condition, event.value.as_ref())
}

/// Deliberately naive classifier: a linear scan over the parsed constraint
/// batch per event, no index. The differential-test oracle for the engine.
pub fn reference_classify(
    logdata: &[RawActivityRecord],
    constraints: &[RawConstraintRecord],
) -> Vec<bool> {
    let parsed: Vec<Constraint> = constraints
        .iter()
        .filter_map(|record| parse_constraint(record).ok())
        .collect();

    logdata
        .iter()
        .map(|record| match normalize(record) {
            Ok(event) => parsed.iter().any(|c| constraint_applies(c, &event)),
            Err(_) => false,
        })
        .collect()
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Small pools so events and constraints collide often enough to exercise
/// every index level.
const DOCUMENTS: &[&str] = &["doc1", "doc2", "doc3", "Revisions", "Budget-2024"];
const ACTORS: &[&str] = &["alice@x", "bob@x", "carol@x", "drew@x", "abt@x"];
const PERMISSIONS: &[&str] = &["none", "can_view", "can_edit", "can_view/can_comment"];

/// Any canonical action kind.
pub fn arb_action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::CanCreate),
        Just(ActionKind::CanDelete),
        Just(ActionKind::CanEdit),
        Just(ActionKind::CanMove),
        Just(ActionKind::CanRename),
        Just(ActionKind::AddPermission),
        Just(ActionKind::RemovePermission),
        Just(ActionKind::UpdatePermission),
    ]
}

/// A document id from the shared pool.
pub fn arb_document_id() -> impl Strategy<Value = String> {
    proptest::sample::select(DOCUMENTS).prop_map(String::from)
}

/// An actor from the shared pool.
pub fn arb_actor() -> impl Strategy<Value = String> {
    proptest::sample::select(ACTORS).prop_map(String::from)
}

/// A valid log timestamp (`YYYY-MM-DDTHH:MM:SS.fffZ`).
pub fn arb_timestamp_str() -> impl Strategy<Value = String> {
    (2023u32..2026, 1u32..13, 1u32..29, 0u32..24, 0u32..60, 0u32..60, 0u32..1000).prop_map(
        |(year, month, day, hour, minute, second, millis)| {
            format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z")
        },
    )
}

/// A raw action string from one of the supported grammars.
pub fn arb_action() -> impl Strategy<Value = String> {
    let plain = proptest::sample::select(&["Create", "Delete", "Edit", "Rename"][..])
        .prop_map(String::from);
    let moved = (
        proptest::sample::select(&["Inbox", "Archive", "Shared"][..]),
        proptest::sample::select(&["Inbox", "Archive", "Shared"][..]),
    )
        .prop_map(|(src, dst)| format!("Move:{src}:{dst}"));
    let permission = (
        proptest::sample::select(PERMISSIONS),
        proptest::sample::select(PERMISSIONS),
        proptest::sample::select(ACTORS),
    )
        .prop_map(|(new, old, target)| {
            format!("Permission Change-to:{new}-from:{old}-for:{target}")
        });
    prop_oneof![plain, moved, permission]
}

/// A well-formed activity record.
pub fn arb_activity_record() -> impl Strategy<Value = RawActivityRecord> {
    (
        arb_timestamp_str(),
        arb_action(),
        arb_document_id(),
        arb_actor(),
    )
        .prop_map(|(time, action, document_id, actor)| activity(&time, &action, &document_id, &actor))
}

/// An `action_type` wire string, occasionally the legacy alias.
fn arb_action_type_str() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_action_kind().prop_map(|kind| kind.as_wire_str().to_string()),
        1 => Just("Time Limit Edit".to_string()),
    ]
}

/// A well-formed constraint record. Operands match the kind: timestamps for
/// edit constraints with a comparator, target users otherwise, with the
/// occasional `""`/`"-"` sentinel mixed in.
pub fn arb_constraint_record() -> impl Strategy<Value = RawConstraintRecord> {
    let comparator = proptest::sample::select(&["", "in", "not in", "gt", "lt"][..]);
    (
        proptest::collection::vec(arb_document_id(), 1..4),
        arb_action_type_str(),
        proptest::collection::vec(arb_actor(), 1..4),
        comparator,
    )
        .prop_flat_map(|(document_ids, action_type, actor_ids, comparator)| {
            let edit_operands = !comparator.is_empty()
                && matches!(
                    action_type.as_str(),
                    "Can Edit" | "Time Limit Edit"
                );
            let operand = if edit_operands {
                arb_timestamp_str().boxed()
            } else {
                prop_oneof![
                    6 => proptest::sample::select(ACTORS).prop_map(String::from),
                    1 => Just(String::new()),
                    1 => Just("-".to_string()),
                ]
                .boxed()
            };
            proptest::collection::vec(operand, 0..4).prop_map(move |allowed_values| {
                RawConstraintRecord::new(
                    document_ids.clone(),
                    action_type.clone(),
                    actor_ids.clone(),
                    comparator,
                    allowed_values,
                )
            })
        })
}

/// A constraint batch.
pub fn arb_constraint_batch(max: usize) -> impl Strategy<Value = Vec<RawConstraintRecord>> {
    proptest::collection::vec(arb_constraint_record(), 0..max)
}
